// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::Workbook;
use crate::models::{NewTransaction, PaidFlag, Transaction};
use crate::session;
use anyhow::{Context, Result};
use csv::ReaderBuilder;

pub fn handle(book: &Workbook, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(book, settings, path)?;
            println!("Imported {} transaction(s) from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Columns: due_date, description, amount, category, kind[, contact[, paid]].
/// Every row is validated before the first one is written.
pub fn import_transactions(book: &Workbook, settings: &Settings, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut parsed: Vec<Transaction> = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = i + 2;
        let field = |idx: usize| rec.get(idx).unwrap_or("").trim().to_string();
        let form = NewTransaction {
            due_date: field(0),
            payment_date: None,
            description: field(1),
            amount: field(2),
            category: field(3),
            kind: field(4),
            contact: Some(field(5)),
            paid: PaidFlag::parse(&field(6)).is_some_and(|p| p.is_paid()),
        };
        let tx = form
            .validate()
            .with_context(|| format!("Line {} of {}", line, path))?;
        parsed.push(tx);
    }

    let mut ledger = session::ledger(book, settings);
    for tx in &parsed {
        ledger.append(tx)?;
    }
    Ok(parsed.len())
}
