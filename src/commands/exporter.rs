// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::Workbook;
use crate::money::storage_amount;
use crate::session::Session;
use anyhow::{Result, anyhow};
use serde_json::json;

pub fn handle(book: &Workbook, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(book, settings, sub),
        _ => Ok(()),
    }
}

fn export_transactions(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let session = Session::load(book, settings, chrono::Local::now().date_naive())?;
    let mut txs = session.transactions;
    txs.sort_by_key(|t| t.due_date);

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "due_date",
            "payment_date",
            "description",
            "amount",
            "category",
            "kind",
            "contact",
            "paid",
        ])?;
        for t in &txs {
            wtr.write_record([
                t.due_date.to_string(),
                t.payment_date.map(|d| d.to_string()).unwrap_or_default(),
                t.description.clone(),
                storage_amount(t.amount),
                t.category.clone(),
                t.kind.to_string(),
                t.contact.clone().unwrap_or_default(),
                t.paid_flag.to_string(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = txs
            .iter()
            .map(|t| {
                json!({
                    "due_date": t.due_date.to_string(),
                    "payment_date": t.payment_date.map(|d| d.to_string()),
                    "description": t.description,
                    "amount": storage_amount(t.amount),
                    "category": t.category,
                    "kind": t.kind.as_str(),
                    "contact": t.contact,
                    "paid": t.paid_flag.as_str(),
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported {} transaction(s) to {}", txs.len(), out);
    Ok(())
}
