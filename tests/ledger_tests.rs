// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finsheet::db::Workbook;
use finsheet::errors::LedgerError;
use finsheet::ledger::{HEADER, LEGACY_HEADER, Layout, LedgerStore};
use finsheet::models::{Kind, NewTransaction, PaidFlag};
use finsheet::sheet::{CsvSheet, MemorySheet, Sheet};
use rust_decimal::Decimal;
use std::str::FromStr;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

fn groceries() -> NewTransaction {
    NewTransaction {
        due_date: "05/01/2025".into(),
        description: "Mercado".into(),
        amount: "200,00".into(),
        category: "Alimentação".into(),
        kind: "Saída".into(),
        contact: Some("+55 11 99999-0000".into()),
        ..Default::default()
    }
}

#[test]
fn append_then_load_round_trips_fields() {
    let mut store = LedgerStore::new(MemorySheet::new("Transactions"));
    let tx = groceries().validate().unwrap();
    store.append(&tx).unwrap();

    let read = store.load_all().unwrap();
    assert!(read.issues.is_empty());
    assert_eq!(read.transactions, vec![tx.clone()]);
    let back = &read.transactions[0];
    assert_eq!(back.amount, Decimal::from(-200));
    assert_eq!(back.kind, Kind::Outflow);
    assert!(back.sign_consistent());

    let raw = store.sheet().rows().unwrap();
    assert_eq!(raw[0], row(&HEADER));
    assert_eq!(raw[1][3], "-200.00");
}

#[test]
fn load_keeps_storage_order() {
    let mut store = LedgerStore::new(MemorySheet::new("Transactions"));
    for (date, desc) in [("2025-03-01", "c"), ("2025-01-01", "a"), ("2025-02-01", "b")] {
        let mut f = groceries();
        f.due_date = date.into();
        f.description = desc.into();
        store.append(&f.validate().unwrap()).unwrap();
    }
    let names: Vec<String> = store
        .load_all()
        .unwrap()
        .transactions
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn bad_amount_is_zeroed_and_reported() {
    let sheet = MemorySheet::with_rows(
        "Transactions",
        vec![
            row(&HEADER),
            row(&["2025-01-02", "", "Luz", "12,34,56", "Gastos Fixos", "Outflow", "", "Unpaid"]),
            row(&["2025-01-03", "", "Água", "-80.10", "Gastos Fixos", "Outflow", "", "Paid"]),
        ],
    );
    let read = LedgerStore::new(sheet).load_all().unwrap();
    assert_eq!(read.transactions.len(), 2);
    assert_eq!(read.transactions[0].amount, Decimal::ZERO);
    assert_eq!(read.transactions[1].amount, Decimal::from_str("-80.10").unwrap());
    assert_eq!(read.transactions[1].paid_flag, PaidFlag::Paid);
    assert_eq!(read.issues.len(), 1);
    assert!(matches!(
        read.issues[0],
        LedgerError::MalformedRow { position: 2, .. }
    ));
}

#[test]
fn undated_rows_are_dropped_and_blank_rows_ignored() {
    let sheet = MemorySheet::with_rows(
        "Transactions",
        vec![
            row(&HEADER),
            row(&["ontem", "", "Pizza", "-40", "Lazer", "Outflow", "", ""]),
            row(&["", "", "", "", "", "", "", ""]),
            row(&["2025-01-04 00:00:00", "", "Pizza", "-40", "Lazer", "", "", ""]),
        ],
    );
    let read = LedgerStore::new(sheet).load_all().unwrap();
    assert_eq!(read.transactions.len(), 1);
    assert_eq!(
        read.transactions[0].due_date,
        NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()
    );
    // empty kind follows the sign
    assert_eq!(read.transactions[0].kind, Kind::Outflow);
    assert_eq!(read.issues.len(), 1);
}

#[test]
fn bad_payment_date_and_unknown_kind_are_reported() {
    let sheet = MemorySheet::with_rows(
        "Transactions",
        vec![
            row(&HEADER),
            row(&["2025-01-02", "garbage", "Luz", "-120", "Casa", "Outflow", "", "Paid"]),
            row(&["2025-01-03", "", "Pix", "35", "Outros", "Entradda", "", ""]),
        ],
    );
    let read = LedgerStore::new(sheet).load_all().unwrap();
    assert_eq!(read.transactions.len(), 2);
    assert_eq!(read.transactions[0].payment_date, None);
    assert_eq!(read.transactions[1].kind, Kind::Inflow);

    let positions: Vec<usize> = read
        .issues
        .iter()
        .map(|e| match e {
            LedgerError::MalformedRow { position, .. } => *position,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(positions, vec![2, 3]);
    assert!(read.issues[0].to_string().contains("payment date"));
    assert!(read.issues[1].to_string().contains("Entradda"));
}

#[test]
fn legacy_five_column_sheet_is_read_and_extended_in_place() {
    let sheet = MemorySheet::with_rows(
        "Transactions",
        vec![
            row(&LEGACY_HEADER),
            row(&["2024-12-20", "Salário", "5000", "Salário", "Entrada"]),
        ],
    );
    let mut store = LedgerStore::new(sheet);
    assert_eq!(store.layout().unwrap(), Layout::Legacy);
    store.append(&groceries().validate().unwrap()).unwrap();

    let rows = store.sheet().rows().unwrap();
    assert_eq!(rows[2].len(), LEGACY_HEADER.len());
    let read = store.load_all().unwrap();
    assert_eq!(read.transactions[0].kind, Kind::Inflow);
    assert_eq!(read.transactions[1].contact, None);
}

#[test]
fn sqlite_and_csv_backends_behave_alike() {
    let tx = groceries().validate().unwrap();

    let book = Workbook::in_memory().unwrap();
    let mut store = LedgerStore::new(book.sheet("Transactions"));
    store.append(&tx).unwrap();
    assert_eq!(store.load_all().unwrap().transactions, vec![tx.clone()]);

    let dir = tempfile::tempdir().unwrap();
    let mut store = LedgerStore::new(CsvSheet::open(dir.path(), "Transactions"));
    store.append(&tx).unwrap();
    assert_eq!(store.load_all().unwrap().transactions, vec![tx]);
}
