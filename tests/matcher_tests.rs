// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finsheet::errors::{LedgerError, LedgerResult};
use finsheet::ledger::LedgerStore;
use finsheet::matcher::delete_matching;
use finsheet::models::{NewTransaction, Transaction};
use finsheet::sheet::{MemorySheet, Sheet};
use std::cell::Cell;

fn tx(due: &str, description: &str, amount: &str, kind: &str) -> Transaction {
    NewTransaction {
        due_date: due.into(),
        description: description.into(),
        amount: amount.into(),
        category: "Casa".into(),
        kind: kind.into(),
        ..Default::default()
    }
    .validate()
    .unwrap()
}

fn five() -> Vec<Transaction> {
    vec![
        tx("2025-01-01", "one", "10", "out"),
        tx("2025-01-02", "two", "20", "out"),
        tx("2025-01-03", "three", "30", "out"),
        tx("2025-01-04", "four", "40", "out"),
        tx("2025-01-05", "five", "50", "out"),
    ]
}

fn store_with(txs: &[Transaction]) -> LedgerStore<MemorySheet> {
    let mut store = LedgerStore::new(MemorySheet::new("Transactions"));
    for t in txs {
        store.append(t).unwrap();
    }
    store
}

#[test]
fn exact_match_removes_one_row() {
    let txs = five();
    let mut store = store_with(&txs);
    let before = store.sheet().row_count().unwrap();

    let report = store.delete(&txs[2]).unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(report.positions, vec![4]);
    assert!(report.warnings.is_empty());
    assert_eq!(store.sheet().row_count().unwrap(), before - 1);
}

#[test]
fn missing_target_is_a_warning_not_an_error() {
    let mut store = store_with(&five());
    let before = store.sheet().rows().unwrap();

    let report = store.delete(&tx("2025-01-03", "three", "31", "out")).unwrap();
    assert_eq!(report.deleted, 0);
    assert!(!report.any_deleted());
    assert!(matches!(
        report.warnings.as_slice(),
        [LedgerError::NoMatchFound { scanned: 5, .. }]
    ));
    assert_eq!(store.sheet().rows().unwrap(), before);
}

#[test]
fn amounts_within_a_cent_still_match() {
    let mut rows = store_with(&five()).sheet().rows().unwrap();
    // a hand-edited cell with more precision than the app writes
    rows[2][3] = "-20.004".into();
    let mut store = LedgerStore::new(MemorySheet::with_rows("Transactions", rows));
    let report = store.delete(&tx("2025-01-02", "two", "20", "out")).unwrap();
    assert_eq!(report.deleted, 1);
    let report = store.delete(&tx("2025-01-03", "three", "30,01", "out")).unwrap();
    assert_eq!(report.deleted, 0);
}

#[test]
fn batch_delete_removes_exactly_the_targets() {
    let txs = five();
    let mut store = store_with(&txs);

    let targets = vec![txs[1].clone(), txs[2].clone(), txs[4].clone()];
    let report = store.delete_many(&targets).unwrap();
    assert_eq!(report.deleted, 3);
    // highest first so nothing shifts underneath
    assert_eq!(report.positions, vec![6, 4, 3]);

    let left = store.load_all().unwrap().transactions;
    assert_eq!(left, vec![txs[0].clone(), txs[3].clone()]);
}

#[test]
fn identical_rows_delete_first_in_storage_order() {
    let dup = tx("2025-02-10", "Netflix", "39,90", "out");
    let other = tx("2025-02-11", "Spotify", "21,90", "out");
    let mut store = store_with(&[dup.clone(), other.clone(), dup.clone()]);

    let report = store.delete(&dup).unwrap();
    assert_eq!(report.positions, vec![2]);
    assert_eq!(
        store.load_all().unwrap().transactions,
        vec![other.clone(), dup.clone()]
    );

    // two targets for two copies claim both rows
    let mut store = store_with(&[dup.clone(), other.clone(), dup.clone()]);
    let report = store.delete_many(&[dup.clone(), dup.clone()]).unwrap();
    assert_eq!(report.deleted, 2);
    assert_eq!(store.load_all().unwrap().transactions, vec![other]);
}

/// Inserts a row right after the header the first time the sheet is re-read,
/// as another writer would.
struct ShiftingSheet {
    inner: MemorySheet,
    reads: Cell<usize>,
    intruder: Vec<String>,
}

impl Sheet for ShiftingSheet {
    fn title(&self) -> &str {
        self.inner.title()
    }

    fn rows(&self) -> LedgerResult<Vec<Vec<String>>> {
        let mut rows = self.inner.rows()?;
        self.reads.set(self.reads.get() + 1);
        if self.reads.get() >= 2 {
            rows.insert(1, self.intruder.clone());
        }
        Ok(rows)
    }

    fn append_row(&mut self, cells: Vec<String>) -> LedgerResult<()> {
        self.inner.append_row(cells)
    }

    fn delete_row(&mut self, position: usize) -> LedgerResult<()> {
        // positions seen by callers include the intruder row
        if position == 2 {
            self.intruder.clear();
            return Ok(());
        }
        self.inner.delete_row(position - 1)
    }
}

#[test]
fn shifted_row_is_found_again_before_deleting() {
    let txs = five();
    let base = store_with(&txs);
    // a copy of "one" written by someone else
    let intruder = base.sheet().rows().unwrap()[1].clone();
    let mut sheet = ShiftingSheet {
        inner: base.sheet().clone(),
        reads: Cell::new(0),
        intruder,
    };

    let report = delete_matching(&mut sheet, std::slice::from_ref(&txs[3])).unwrap();
    assert_eq!(report.deleted, 1);
    // scanned at 5, found at 6 after the shift
    assert_eq!(report.positions, vec![6]);
    let left: Vec<String> = sheet.inner.rows().unwrap()[1..]
        .iter()
        .map(|r| r[2].clone())
        .collect();
    assert_eq!(left, vec!["one", "two", "three", "five"]);
}
