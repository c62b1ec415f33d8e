// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cards::CardRegistry;
use crate::categories::CategoryRegistry;
use crate::config::Settings;
use crate::dashboard::{Dashboard, DashboardOptions};
use crate::db::Workbook;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::LedgerStore;
use crate::models::{Card, Transaction};
use crate::sheet::Sheet;
use crate::utils::month_key;
use chrono::NaiveDate;
use regex::Regex;

pub type BookSheet<'b> = Box<dyn Sheet + 'b>;

pub fn ledger<'b>(book: &'b Workbook, settings: &Settings) -> LedgerStore<BookSheet<'b>> {
    LedgerStore::new(book.sheet(&settings.ledger_sheet))
}

pub fn cards<'b>(book: &'b Workbook, settings: &Settings) -> CardRegistry<BookSheet<'b>> {
    CardRegistry::new(book.sheet(&settings.cards_sheet))
}

pub fn categories<'b>(book: &'b Workbook, settings: &Settings) -> CategoryRegistry<BookSheet<'b>> {
    CategoryRegistry::new(book.sheet(&settings.categories_sheet))
}

/// The snapshot of one request. It goes stale as soon as anything writes to
/// the workbook, including this process.
#[derive(Debug)]
pub struct Session {
    pub reference_date: NaiveDate,
    pub transactions: Vec<Transaction>,
    pub cards: Vec<Card>,
    pub categories: Vec<String>,
    pub issues: Vec<LedgerError>,
}

#[derive(Debug, Default)]
pub struct HistoryFilter {
    pub month: Option<String>,
    pub search: Option<Regex>,
    pub unpaid_only: bool,
    pub limit: Option<usize>,
}

impl Session {
    pub fn load(book: &Workbook, settings: &Settings, reference_date: NaiveDate) -> LedgerResult<Session> {
        let read = ledger(book, settings).load_all()?;
        let (cards, card_issues) = cards(book, settings).load_all()?;
        let categories = categories(book, settings).list()?;
        let mut issues = read.issues;
        issues.extend(card_issues);
        Ok(Session {
            reference_date,
            transactions: read.transactions,
            cards,
            categories,
            issues,
        })
    }

    pub fn from_parts(reference_date: NaiveDate, transactions: Vec<Transaction>, cards: Vec<Card>) -> Session {
        Session {
            reference_date,
            transactions,
            cards,
            categories: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// All transactions, latest due date first (stable), numbered from 1.
    /// The numbering is what `tx rm --index` refers to.
    pub fn numbered_history(&self) -> Vec<(usize, &Transaction)> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        sorted.into_iter().enumerate().map(|(i, t)| (i + 1, t)).collect()
    }

    pub fn history(&self, filter: &HistoryFilter) -> Vec<(usize, &Transaction)> {
        let rows = self.numbered_history().into_iter().filter(|(_, t)| {
            filter.month.as_deref().is_none_or(|m| month_key(t.due_date) == m)
                && filter
                    .search
                    .as_ref()
                    .is_none_or(|re| re.is_match(&t.description) || re.is_match(&t.category))
                && (!filter.unpaid_only || !t.paid_flag.is_paid())
        });
        match filter.limit {
            Some(n) => rows.take(n).collect(),
            None => rows.collect(),
        }
    }

    pub fn history_entry(&self, index: usize) -> Option<&Transaction> {
        self.numbered_history()
            .into_iter()
            .find(|(i, _)| *i == index)
            .map(|(_, t)| t)
    }

    pub fn card(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name.trim())
    }

    pub fn dashboard(&self, opts: &DashboardOptions) -> Dashboard {
        Dashboard::compute(&self.transactions, &self.cards, self.reference_date, opts)
    }
}
