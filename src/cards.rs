// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{LedgerError, LedgerResult};
use crate::matcher::{self, DeleteReport, RowMatcher};
use crate::models::{Card, parse_due_day};
use crate::money::{amounts_match, parse_amount, storage_amount};
use crate::sheet::{Sheet, cell};
use rust_decimal::Decimal;
use std::fmt;

pub const HEADER: [&str; 3] = ["Name", "Limit", "DueDay"];

pub struct CardRegistry<S: Sheet> {
    sheet: S,
}

impl<S: Sheet> CardRegistry<S> {
    pub fn new(sheet: S) -> Self {
        Self { sheet }
    }

    pub fn init(&mut self) -> LedgerResult<()> {
        self.sheet.ensure_header(&HEADER)?;
        Ok(())
    }

    pub fn append(&mut self, card: &Card) -> LedgerResult<()> {
        let header = self.sheet.ensure_header(&HEADER)?;
        let mut cells = vec![card.name.clone(), storage_amount(card.limit)];
        // older sheets have no DueDay column
        if header.len() >= HEADER.len() {
            cells.push(card.due_day.map(|d| d.to_string()).unwrap_or_default());
        }
        self.sheet.append_row(cells)?;
        log::info!("registered card '{}'", card.name);
        Ok(())
    }

    /// Rows with an empty name are blank lines and are skipped. A bad limit is
    /// read as zero and a bad due day as none; both are reported.
    pub fn load_all(&self) -> LedgerResult<(Vec<Card>, Vec<LedgerError>)> {
        let rows = self.sheet.rows()?;
        let mut cards = Vec::new();
        let mut issues = Vec::new();
        for (i, cells) in rows.iter().enumerate().skip(1) {
            let name = cell(cells, 0);
            if name.is_empty() {
                continue;
            }
            let limit = match parse_amount(cell(cells, 1)) {
                Ok(l) => l,
                Err(e) => {
                    issues.push(self.malformed(i + 1, e.to_string()));
                    Decimal::ZERO
                }
            };
            let due_day = match cell(cells, 2) {
                "" => None,
                raw => match parse_due_day(raw) {
                    Ok(d) => Some(d),
                    Err(e) => {
                        issues.push(self.malformed(i + 1, e.to_string()));
                        None
                    }
                },
            };
            cards.push(Card {
                name: name.to_string(),
                limit,
                due_day,
            });
        }
        Ok((cards, issues))
    }

    /// Removes the first card matching name, limit and due day.
    pub fn delete(&mut self, card: &Card) -> LedgerResult<DeleteReport> {
        matcher::delete_matching(&mut self.sheet, std::slice::from_ref(card))
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

#[derive(Debug, Clone, PartialEq)]
pub struct CardKey {
    pub name: String,
    pub limit: Decimal,
    pub due_day: Option<u32>,
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.due_day {
            Some(d) => write!(f, "{} | {} | day {}", self.name, storage_amount(self.limit), d),
            None => write!(f, "{} | {} | no due day", self.name, storage_amount(self.limit)),
        }
    }
}

impl RowMatcher for Card {
    type Key = CardKey;

    fn target_key(&self) -> CardKey {
        CardKey {
            name: self.name.trim().to_string(),
            limit: self.limit,
            due_day: self.due_day,
        }
    }

    fn stored_key(_header: &[String], cells: &[String]) -> Option<CardKey> {
        let name = cell(cells, 0);
        if name.is_empty() {
            return None;
        }
        Some(CardKey {
            name: name.to_string(),
            limit: parse_amount(cell(cells, 1)).unwrap_or(Decimal::ZERO),
            due_day: parse_due_day(cell(cells, 2)).ok(),
        })
    }

    fn keys_match(target: &CardKey, stored: &CardKey) -> bool {
        target.name == stored.name
            && amounts_match(target.limit, stored.limit)
            && target.due_day == stored.due_day
    }
}
