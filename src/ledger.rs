// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The transaction ledger sheet: append, full read, and delete-by-match.

use crate::errors::{LedgerError, LedgerResult};
use crate::matcher::{self, DeleteReport, RowMatcher};
use crate::models::{Kind, PaidFlag, Transaction};
use crate::money::{amounts_match, parse_amount, storage_amount};
use crate::sheet::{Sheet, cell, is_blank};
use crate::utils::parse_date;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

pub const HEADER: [&str; 8] = [
    "DueDate",
    "PaymentDate",
    "Description",
    "Amount",
    "Category",
    "Kind",
    "Contact",
    "PaidFlag",
];

pub const LEGACY_HEADER: [&str; 5] = ["Date", "Description", "Amount", "Category", "Kind"];

/// Column layout of a ledger sheet, decided by the width of its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Full,
    Legacy,
}

impl Layout {
    pub fn detect(header: &[String]) -> Layout {
        if header.len() < HEADER.len() {
            Layout::Legacy
        } else {
            Layout::Full
        }
    }
}

/// Raw text fields of one stored row, trimmed, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow<'a> {
    pub due_date: &'a str,
    pub payment_date: &'a str,
    pub description: &'a str,
    pub amount: &'a str,
    pub category: &'a str,
    pub kind: &'a str,
    pub contact: &'a str,
    pub paid_flag: &'a str,
}

impl<'a> RawRow<'a> {
    pub fn from_cells(layout: Layout, cells: &'a [String]) -> RawRow<'a> {
        match layout {
            Layout::Full => RawRow {
                due_date: cell(cells, 0),
                payment_date: cell(cells, 1),
                description: cell(cells, 2),
                amount: cell(cells, 3),
                category: cell(cells, 4),
                kind: cell(cells, 5),
                contact: cell(cells, 6),
                paid_flag: cell(cells, 7),
            },
            Layout::Legacy => RawRow {
                due_date: cell(cells, 0),
                payment_date: "",
                description: cell(cells, 1),
                amount: cell(cells, 2),
                category: cell(cells, 3),
                kind: cell(cells, 4),
                contact: "",
                paid_flag: "",
            },
        }
    }
}

/// Result of a full read: records plus the per-row problems that were recovered.
#[derive(Debug, Default)]
pub struct LedgerRead {
    pub transactions: Vec<Transaction>,
    pub issues: Vec<LedgerError>,
}

pub struct LedgerStore<S: Sheet> {
    sheet: S,
}

impl<S: Sheet> LedgerStore<S> {
    pub fn new(sheet: S) -> Self {
        Self { sheet }
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    pub fn layout(&self) -> LedgerResult<Layout> {
        Ok(match self.sheet.rows()?.first() {
            Some(header) => Layout::detect(header),
            None => Layout::Full,
        })
    }

    /// Writes the header into an empty sheet.
    pub fn init(&mut self) -> LedgerResult<()> {
        self.sheet.ensure_header(&HEADER)?;
        Ok(())
    }

    /// Writes one row. No read-back is performed.
    pub fn append(&mut self, tx: &Transaction) -> LedgerResult<()> {
        let header = self.sheet.ensure_header(&HEADER)?;
        let cells = to_cells(Layout::detect(&header), tx);
        self.sheet.append_row(cells)?;
        log::info!(
            "appended '{}' {} to sheet '{}'",
            tx.description,
            storage_amount(tx.amount),
            self.sheet.title()
        );
        Ok(())
    }

    /// Reads every data row in storage order. A bad amount becomes zero, a bad
    /// payment date becomes none, an unknown kind follows the sign, and a bad
    /// due date drops the row; all are reported in `issues`.
    pub fn load_all(&self) -> LedgerResult<LedgerRead> {
        let rows = self.sheet.rows()?;
        let mut read = LedgerRead::default();
        let Some((header, data)) = rows.split_first() else {
            return Ok(read);
        };
        let layout = Layout::detect(header);
        for (i, cells) in data.iter().enumerate() {
            if is_blank(cells) {
                continue;
            }
            let position = i + 2;
            match from_row(layout, cells) {
                Ok((tx, problems)) => {
                    for reason in problems {
                        read.issues.push(self.malformed(position, reason));
                    }
                    read.transactions.push(tx);
                }
                Err(reason) => read.issues.push(self.malformed(position, reason)),
            }
        }
        Ok(read)
    }

    pub fn delete(&mut self, target: &Transaction) -> LedgerResult<DeleteReport> {
        matcher::delete_matching(&mut self.sheet, std::slice::from_ref(target))
    }

    pub fn delete_many(&mut self, targets: &[Transaction]) -> LedgerResult<DeleteReport> {
        matcher::delete_matching(&mut self.sheet, targets)
    }

    fn malformed(&self, position: usize, reason: String) -> LedgerError {
        let err = LedgerError::MalformedRow {
            sheet: self.sheet.title().to_string(),
            position,
            reason,
        };
        log::warn!("{}", err);
        err
    }
}

pub fn to_cells(layout: Layout, tx: &Transaction) -> Vec<String> {
    let due = tx.due_date.format("%Y-%m-%d").to_string();
    match layout {
        Layout::Full => vec![
            due,
            tx.payment_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            tx.description.clone(),
            storage_amount(tx.amount),
            tx.category.clone(),
            tx.kind.as_str().to_string(),
            tx.contact.clone().unwrap_or_default(),
            tx.paid_flag.as_str().to_string(),
        ],
        Layout::Legacy => vec![
            due,
            tx.description.clone(),
            storage_amount(tx.amount),
            tx.category.clone(),
            tx.kind.as_str().to_string(),
        ],
    }
}

/// Interprets a stored row. `Err` means the row cannot become a record at all;
/// the returned strings are cell problems that were recovered.
fn from_row(layout: Layout, cells: &[String]) -> Result<(Transaction, Vec<String>), String> {
    let raw = RawRow::from_cells(layout, cells);
    let due_date = parse_date(raw.due_date).map_err(|e| e.to_string())?;
    let mut issues = Vec::new();

    let payment_date = if raw.payment_date.is_empty() {
        None
    } else {
        match parse_date(raw.payment_date) {
            Ok(d) => Some(d),
            Err(e) => {
                issues.push(format!("payment date: {}", e));
                None
            }
        }
    };

    let amount = match parse_amount(raw.amount) {
        Ok(a) => a,
        Err(e) => {
            issues.push(e.to_string());
            Decimal::ZERO
        }
    };
    if !raw.kind.is_empty() && Kind::parse(raw.kind).is_none() {
        issues.push(format!("unknown kind '{}', taken from the amount sign", raw.kind));
    }
    let kind = interpret_kind(raw.kind, amount);
    let paid_flag = interpret_paid(raw.paid_flag);

    Ok((
        Transaction {
            due_date,
            payment_date,
            description: raw.description.to_string(),
            amount,
            category: raw.category.to_string(),
            kind,
            contact: Some(raw.contact)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            paid_flag,
        },
        issues,
    ))
}

/// Unknown or empty kinds (legacy rows) follow the amount sign.
pub(crate) fn interpret_kind(raw: &str, amount: Decimal) -> Kind {
    Kind::parse(raw).unwrap_or(if amount > Decimal::ZERO {
        Kind::Inflow
    } else {
        Kind::Outflow
    })
}

pub(crate) fn interpret_paid(raw: &str) -> PaidFlag {
    PaidFlag::parse(raw).unwrap_or_default()
}

/// Identity of a ledger row for deletion: every field except the payment date.
#[derive(Debug, Clone, PartialEq)]
pub struct TxKey {
    pub due_date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: Kind,
    pub contact: String,
    pub paid_flag: PaidFlag,
}

impl fmt::Display for TxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {} | {} | {}",
            self.due_date,
            self.description,
            storage_amount(self.amount),
            self.category,
            self.kind,
            if self.contact.is_empty() { "-" } else { self.contact.as_str() },
            self.paid_flag
        )
    }
}

impl RowMatcher for Transaction {
    type Key = TxKey;

    fn target_key(&self) -> TxKey {
        TxKey {
            due_date: self.due_date,
            description: self.description.trim().to_string(),
            amount: self.amount,
            category: self.category.trim().to_string(),
            kind: self.kind,
            contact: self.contact.as_deref().unwrap_or("").trim().to_string(),
            paid_flag: self.paid_flag,
        }
    }

    fn stored_key(header: &[String], cells: &[String]) -> Option<TxKey> {
        let raw = RawRow::from_cells(Layout::detect(header), cells);
        let due_date = parse_date(raw.due_date).ok()?;
        // same zero substitution as load_all, so a listed record can be removed
        let amount = parse_amount(raw.amount).unwrap_or(Decimal::ZERO);
        Some(TxKey {
            due_date,
            description: raw.description.to_string(),
            amount,
            category: raw.category.to_string(),
            kind: interpret_kind(raw.kind, amount),
            contact: raw.contact.to_string(),
            paid_flag: interpret_paid(raw.paid_flag),
        })
    }

    fn keys_match(target: &TxKey, stored: &TxKey) -> bool {
        target.due_date == stored.due_date
            && target.description == stored.description
            && amounts_match(target.amount, stored.amount)
            && target.category == stored.category
            && target.kind == stored.kind
            && target.contact == stored.contact
            && target.paid_flag == stored.paid_flag
    }
}
