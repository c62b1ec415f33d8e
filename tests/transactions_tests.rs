// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finsheet::cli::build_cli;
use finsheet::commands::{cards, transactions};
use finsheet::config::Settings;
use finsheet::db::Workbook;
use finsheet::errors::LedgerError;
use finsheet::models::Kind;
use finsheet::session;
use rust_decimal::Decimal;

fn tx_cmd(book: &Workbook, settings: &Settings, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["finsheet", "tx"];
    argv.extend_from_slice(args);
    let m = build_cli().get_matches_from(argv);
    let (_, sub) = m.subcommand().unwrap();
    transactions::handle(book, settings, sub)
}

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let m = build_cli().get_matches_from(args);
    let (_, group) = m.subcommand().unwrap();
    group.subcommand().unwrap().1.clone()
}

fn seed(book: &Workbook, settings: &Settings) {
    tx_cmd(book, settings, &[
        "add", "--due", "05/01/2025", "--description", "Salário", "--amount", "5.000,00",
        "--kind", "in", "--category", "Salário", "--paid",
    ])
    .unwrap();
    tx_cmd(book, settings, &[
        "add", "--due", "2025-01-10", "--description", "Aluguel", "--amount", "1.500,00",
        "--kind", "out", "--category", "Casa", "--contact", "Imobiliária",
    ])
    .unwrap();
    tx_cmd(book, settings, &[
        "add", "--due", "2025-02-10", "--description", "Aluguel", "--amount", "1500",
        "--kind", "out", "--category", "Casa",
    ])
    .unwrap();
}

#[test]
fn add_signs_amount_by_kind() {
    let book = Workbook::in_memory().unwrap();
    let settings = Settings::default();
    seed(&book, &settings);

    let read = session::ledger(&book, &settings).load_all().unwrap();
    assert_eq!(read.transactions.len(), 3);
    assert_eq!(read.transactions[0].amount, Decimal::from(5000));
    assert!(read.transactions[0].paid_flag.is_paid());
    assert_eq!(read.transactions[1].amount, Decimal::from(-1500));
    assert_eq!(read.transactions[1].kind, Kind::Outflow);
    assert_eq!(read.transactions[1].contact.as_deref(), Some("Imobiliária"));
}

#[test]
fn invalid_form_writes_nothing() {
    let book = Workbook::in_memory().unwrap();
    let settings = Settings::default();
    let err = tx_cmd(&book, &settings, &[
        "add", "--due", "2025-01-10", "--description", "  ", "--amount", "10",
        "--kind", "out", "--category", "Casa",
    ])
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::EmptyRequiredField { field: "description" })
    ));
    let err = tx_cmd(&book, &settings, &[
        "add", "--due", "2025-01-10", "--description", "x", "--amount", "dez",
        "--kind", "out", "--category", "Casa",
    ])
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::InvalidAmount { .. })
    ));
    let read = session::ledger(&book, &settings).load_all().unwrap();
    assert!(read.transactions.is_empty());
}

#[test]
fn list_numbers_latest_first_and_filters() {
    let book = Workbook::in_memory().unwrap();
    let settings = Settings::default();
    seed(&book, &settings);

    let sub = sub_matches(&["finsheet", "tx", "list"]);
    let (rows, issues) = transactions::query_rows(&book, &settings, &sub).unwrap();
    assert_eq!(issues, 0);
    let order: Vec<(usize, &str)> = rows.iter().map(|r| (r.index, r.due_date.as_str())).collect();
    assert_eq!(order, vec![(1, "2025-02-10"), (2, "2025-01-10"), (3, "2025-01-05")]);

    let sub = sub_matches(&["finsheet", "tx", "list", "--month", "2025-01", "--unpaid"]);
    let (rows, _) = transactions::query_rows(&book, &settings, &sub).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Aluguel");
    assert_eq!(rows[0].index, 2);

    let sub = sub_matches(&["finsheet", "tx", "list", "--search", "SAL", "--limit", "5"]);
    let (rows, _) = transactions::query_rows(&book, &settings, &sub).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "R$ 5.000,00");
}

#[test]
fn rm_by_fields_and_by_index() {
    let book = Workbook::in_memory().unwrap();
    let settings = Settings::default();
    seed(&book, &settings);

    let sub = sub_matches(&[
        "finsheet", "tx", "rm", "--due", "10/02/2025", "--description", "Aluguel",
        "--amount", "1.500,00", "--kind", "out", "--category", "Casa",
    ]);
    let report = transactions::remove(&book, &settings, &sub).unwrap();
    assert_eq!(report.deleted, 1);

    // 1 = Aluguel (Jan), 2 = Salário
    let sub = sub_matches(&["finsheet", "tx", "rm", "--index", "1", "--index", "2"]);
    let report = transactions::remove(&book, &settings, &sub).unwrap();
    assert_eq!(report.deleted, 2);
    let read = session::ledger(&book, &settings).load_all().unwrap();
    assert!(read.transactions.is_empty());

    let sub = sub_matches(&["finsheet", "tx", "rm", "--index", "1"]);
    assert!(transactions::remove(&book, &settings, &sub).is_err());
}

#[test]
fn rm_without_match_reports_a_warning() {
    let book = Workbook::in_memory().unwrap();
    let settings = Settings::default();
    seed(&book, &settings);

    let sub = sub_matches(&[
        "finsheet", "tx", "rm", "--due", "2025-01-10", "--description", "Aluguel",
        "--amount", "1400", "--kind", "out", "--category", "Casa",
    ]);
    let report = transactions::remove(&book, &settings, &sub).unwrap();
    assert_eq!(report.deleted, 0);
    assert_eq!(report.warnings.len(), 1);
    assert!(tx_cmd(&book, &settings, &[
        "rm", "--due", "2025-01-10", "--description", "Aluguel", "--amount", "1400",
        "--kind", "out", "--category", "Casa",
    ])
    .is_ok());
}

#[test]
fn card_purchase_needs_a_registered_card() {
    let book = Workbook::in_memory().unwrap();
    let settings = Settings::default();

    let purchase = [
        "add", "--due", "2025-03-01", "--description", "Tênis", "--amount", "300",
        "--card", "Nubank",
    ];
    assert!(tx_cmd(&book, &settings, &purchase).is_err());

    let m = build_cli().get_matches_from([
        "finsheet", "card", "add", "--name", "Nubank", "--limit", "2.000,00", "--due-day", "10",
    ]);
    cards::handle(&book, &settings, m.subcommand().unwrap().1).unwrap();
    tx_cmd(&book, &settings, &purchase).unwrap();

    let read = session::ledger(&book, &settings).load_all().unwrap();
    assert_eq!(read.transactions[0].category, "Nubank");
    assert_eq!(read.transactions[0].amount, Decimal::from(-300));

    let sub = sub_matches(&["finsheet", "card", "rm", "--index", "1"]);
    assert_eq!(cards::remove(&book, &settings, &sub).unwrap().deleted, 1);
    let (left, _) = session::cards(&book, &settings).load_all().unwrap();
    assert!(left.is_empty());
}

#[test]
fn csv_workbook_round_trips_through_commands() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings
        .apply_overrides(
            Some(dir.path().to_string_lossy().into_owned()),
            Some("csv".into()),
        )
        .unwrap();
    let book = Workbook::open(&settings).unwrap();
    seed(&book, &settings);
    assert!(dir.path().join("Transactions.csv").exists());

    let sub = sub_matches(&["finsheet", "tx", "rm", "--index", "1"]);
    assert_eq!(transactions::remove(&book, &settings, &sub).unwrap().deleted, 1);
    let read = session::ledger(&book, &settings).load_all().unwrap();
    assert_eq!(read.transactions.len(), 2);
}

#[test]
fn unregistered_category_is_recorded_but_flagged() {
    let book = Workbook::in_memory().unwrap();
    let settings = Settings::default();
    session::categories(&book, &settings)
        .seed(&settings.default_categories)
        .unwrap();

    assert!(transactions::warn_unknown_category(&book, &settings, "Casa").unwrap());
    assert!(!transactions::warn_unknown_category(&book, &settings, "alimentação").unwrap());

    tx_cmd(&book, &settings, &[
        "add", "--due", "2025-01-10", "--description", "Aluguel", "--amount", "1500",
        "--kind", "out", "--category", "Casa",
    ])
    .unwrap();
    let read = session::ledger(&book, &settings).load_all().unwrap();
    assert_eq!(read.transactions[0].category, "Casa");
}
