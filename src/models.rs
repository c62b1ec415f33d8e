// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{LedgerError, LedgerResult};
use crate::money::{parse_amount, round_cents};
use crate::utils::parse_date;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Inflow,
    Outflow,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Inflow => "Inflow",
            Kind::Outflow => "Outflow",
        }
    }

    /// Accepts the stored labels, the legacy Portuguese ones, and CLI shorthands.
    pub fn parse(s: &str) -> Option<Kind> {
        match s.trim().to_lowercase().as_str() {
            "inflow" | "in" | "income" | "entrada" => Some(Kind::Inflow),
            "outflow" | "out" | "expense" | "saída" | "saida" => Some(Kind::Outflow),
            _ => None,
        }
    }

    /// Applies this kind's sign to the magnitude of `amount`.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Kind::Inflow => amount.abs(),
            Kind::Outflow => -amount.abs(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaidFlag {
    #[default]
    Unpaid,
    Paid,
}

impl PaidFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            PaidFlag::Unpaid => "Unpaid",
            PaidFlag::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Option<PaidFlag> {
        match s.trim().to_lowercase().as_str() {
            "paid" | "pago" | "yes" | "true" => Some(PaidFlag::Paid),
            "unpaid" | "pendente" | "não pago" | "nao pago" | "no" | "false" => {
                Some(PaidFlag::Unpaid)
            }
            _ => None,
        }
    }

    pub fn is_paid(self) -> bool {
        self == PaidFlag::Paid
    }
}

impl fmt::Display for PaidFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub description: String,
    pub amount: Decimal, // signed: inflow > 0, outflow < 0
    pub category: String,
    pub kind: Kind,
    pub contact: Option<String>,
    pub paid_flag: PaidFlag,
}

impl Transaction {
    pub fn is_inflow(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// `amount > 0` iff `kind == Inflow`.
    pub fn sign_consistent(&self) -> bool {
        match self.kind {
            Kind::Inflow => self.amount > Decimal::ZERO,
            Kind::Outflow => self.amount < Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub limit: Decimal,
    pub due_day: Option<u32>,
}

/// Raw form input for a new transaction, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub due_date: String,
    pub payment_date: Option<String>,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub kind: String,
    pub contact: Option<String>,
    pub paid: bool,
}

impl NewTransaction {
    /// Validates the form. Nothing is written when this fails.
    pub fn validate(&self) -> LedgerResult<Transaction> {
        let description = required("description", &self.description)?;
        let category = required("category", &self.category)?;
        let due_date = parse_date(&self.due_date)?;
        let payment_date = match self.payment_date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(parse_date(s)?),
            _ => None,
        };
        let kind = Kind::parse(&self.kind).ok_or_else(|| LedgerError::InvalidField {
            field: "kind",
            value: self.kind.clone(),
        })?;
        // zero once rounded to what the sheet stores
        let magnitude = round_cents(parse_amount(&self.amount)?);
        if magnitude.is_zero() {
            return Err(LedgerError::InvalidAmount {
                input: self.amount.clone(),
            });
        }
        let contact = self
            .contact
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Transaction {
            due_date,
            payment_date,
            description,
            amount: kind.signed(magnitude),
            category,
            kind,
            contact,
            paid_flag: if self.paid {
                PaidFlag::Paid
            } else {
                PaidFlag::Unpaid
            },
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub name: String,
    pub limit: String,
    pub due_day: Option<String>,
}

impl NewCard {
    pub fn validate(&self) -> LedgerResult<Card> {
        let name = required("name", &self.name)?;
        let limit = round_cents(parse_amount(&self.limit)?);
        if limit <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount {
                input: self.limit.clone(),
            });
        }
        let due_day = match self.due_day.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(parse_due_day(s)?),
            _ => None,
        };
        Ok(Card {
            name,
            limit,
            due_day,
        })
    }
}

pub fn parse_due_day(s: &str) -> LedgerResult<u32> {
    s.trim()
        .parse::<u32>()
        .ok()
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| LedgerError::InvalidField {
            field: "due day",
            value: s.to_string(),
        })
}

fn required(field: &'static str, value: &str) -> LedgerResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(LedgerError::EmptyRequiredField { field });
    }
    Ok(v.to_string())
}
