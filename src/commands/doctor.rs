// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::Workbook;
use crate::matcher::RowMatcher;
use crate::models::Transaction;
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(book: &Workbook, settings: &Settings) -> Result<()> {
    let rows = diagnose(book, settings)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn diagnose(book: &Workbook, settings: &Settings) -> Result<Vec<Vec<String>>> {
    let session = Session::load(book, settings, chrono::Local::now().date_naive())?;
    let mut rows = Vec::new();

    // 1) Rows recovered during the read
    for issue in &session.issues {
        rows.push(vec!["malformed_row".into(), issue.to_string()]);
    }

    // 2) Kind disagrees with the amount sign (zeroed rows are already in 1)
    for t in session
        .transactions
        .iter()
        .filter(|t| !t.amount.is_zero() && !t.sign_consistent())
    {
        rows.push(vec![
            "kind_sign_mismatch".into(),
            t.target_key().to_string(),
        ]);
    }

    // 3) Field-identical rows; a delete can only ever reach the first one
    let txs: &[Transaction] = &session.transactions;
    for (i, t) in txs.iter().enumerate() {
        let key = t.target_key();
        let seen_before = txs[..i]
            .iter()
            .any(|o| Transaction::keys_match(&o.target_key(), &key));
        if seen_before {
            continue;
        }
        let copies = txs[i..]
            .iter()
            .filter(|o| Transaction::keys_match(&key, &o.target_key()))
            .count();
        if copies > 1 {
            rows.push(vec!["duplicate_rows".into(), format!("{} x [{}]", copies, key)]);
        }
    }

    // 4) Cards without a usable limit
    for c in session.cards.iter().filter(|c| c.limit <= Decimal::ZERO) {
        rows.push(vec!["card_without_limit".into(), c.name.clone()]);
    }
    Ok(rows)
}
