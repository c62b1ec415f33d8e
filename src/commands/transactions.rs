// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::dashboard::upcoming_dues;
use crate::db::Workbook;
use crate::matcher::DeleteReport;
use crate::models::{NewTransaction, Transaction};
use crate::money::fmt_money;
use crate::session::{self, HistoryFilter, Session};
use crate::utils::{fmt_date, maybe_print_json, parse_date, parse_month, pretty_table, search_pattern};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;

pub fn handle(book: &Workbook, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(book, settings, sub)?,
        Some(("list", sub)) => list(book, settings, sub)?,
        Some(("rm", sub)) => {
            let report = remove(book, settings, sub)?;
            for w in &report.warnings {
                eprintln!("warning: {}", w);
            }
            println!("Removed {} transaction(s)", report.deleted);
        }
        Some(("due", sub)) => due(book, settings, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt(sub: &clap::ArgMatches, id: &str) -> Option<String> {
    sub.get_one::<String>(id).map(|s| s.to_string())
}

pub fn form_from_matches(sub: &clap::ArgMatches) -> NewTransaction {
    NewTransaction {
        due_date: opt(sub, "due").unwrap_or_default(),
        payment_date: sub.try_get_one::<String>("paid_on").ok().flatten().cloned(),
        description: opt(sub, "description").unwrap_or_default(),
        amount: opt(sub, "amount").unwrap_or_default(),
        category: opt(sub, "category").unwrap_or_default(),
        kind: opt(sub, "kind").unwrap_or_default(),
        contact: opt(sub, "contact"),
        paid: sub.get_flag("paid"),
    }
}

fn add(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let mut form = form_from_matches(sub);
    if let Some(card) = sub.get_one::<String>("card") {
        let (cards, _) = session::cards(book, settings).load_all()?;
        let card = card.trim();
        if !cards.iter().any(|c| c.name == card) {
            return Err(anyhow!("Card '{}' not found", card));
        }
        form.category = card.to_string();
        form.kind = "out".into();
    }
    let tx = form.validate()?;
    if sub.get_one::<String>("card").is_none() {
        warn_unknown_category(book, settings, &tx.category)?;
    }
    session::ledger(book, settings).append(&tx)?;
    println!(
        "Recorded {} on {} '{}' ({})",
        fmt_money(tx.amount, &settings.currency_symbol),
        fmt_date(tx.due_date),
        tx.description,
        tx.category
    );
    Ok(())
}

/// Categories are advisory: an unregistered one is recorded but flagged.
pub fn warn_unknown_category(book: &Workbook, settings: &Settings, category: &str) -> Result<bool> {
    let registry = session::categories(book, settings);
    if registry.contains(category)? {
        return Ok(false);
    }
    log::warn!("category '{}' is not registered", category);
    eprintln!(
        "warning: category '{}' is not registered; add it with `finsheet category add --name`",
        category
    );
    Ok(true)
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub index: usize,
    pub due_date: String,
    pub payment_date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub kind: String,
    pub contact: String,
    pub paid: String,
}

impl TransactionRow {
    fn new(index: usize, t: &Transaction, symbol: &str) -> Self {
        TransactionRow {
            index,
            due_date: t.due_date.to_string(),
            payment_date: t.payment_date.map(|d| d.to_string()).unwrap_or_default(),
            description: t.description.clone(),
            amount: fmt_money(t.amount, symbol),
            category: t.category.clone(),
            kind: t.kind.to_string(),
            contact: t.contact.clone().unwrap_or_default(),
            paid: t.paid_flag.to_string(),
        }
    }
}

pub fn query_rows(
    book: &Workbook,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<(Vec<TransactionRow>, usize)> {
    let session = Session::load(book, settings, chrono::Local::now().date_naive())?;
    let filter = HistoryFilter {
        month: sub.get_one::<String>("month").map(|m| parse_month(m)).transpose()?,
        search: sub
            .get_one::<String>("search")
            .map(|s| search_pattern(s))
            .transpose()?,
        unpaid_only: sub.get_flag("unpaid"),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let rows = session
        .history(&filter)
        .into_iter()
        .map(|(i, t)| TransactionRow::new(i, t, &settings.currency_symbol))
        .collect();
    Ok((rows, session.issues.len()))
}

fn list(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (data, issues) = query_rows(book, settings, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("No transactions recorded.");
        } else {
            let rows: Vec<Vec<String>> = data
                .iter()
                .map(|r| {
                    vec![
                        r.index.to_string(),
                        r.due_date.clone(),
                        r.description.clone(),
                        r.category.clone(),
                        r.amount.clone(),
                        r.paid.clone(),
                        r.contact.clone(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["#", "Due", "Description", "Category", "Amount", "Status", "Contact"],
                    rows,
                )
            );
        }
    }
    if issues > 0 {
        eprintln!(
            "warning: {} malformed row(s) were recovered; run `finsheet doctor` for details",
            issues
        );
    }
    Ok(())
}

/// Resolves the targets (by list number or by fields) and deletes them in one batch.
pub fn remove(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<DeleteReport> {
    let targets: Vec<Transaction> = match sub.get_many::<usize>("index") {
        Some(indexes) => {
            let session = Session::load(book, settings, chrono::Local::now().date_naive())?;
            indexes
                .map(|i| {
                    session
                        .history_entry(*i)
                        .cloned()
                        .with_context(|| format!("No transaction #{} in the current list", i))
                })
                .collect::<Result<_>>()?
        }
        None => vec![form_from_matches(sub).validate()?],
    };
    Ok(session::ledger(book, settings).delete_many(&targets)?)
}

fn due(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let reference = match sub.get_one::<String>("ref_date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let days = *sub.get_one::<i64>("days").unwrap_or(&7);
    let session = Session::load(book, settings, reference)?;
    let rows: Vec<Vec<String>> = upcoming_dues(&session.transactions, reference, days)
        .iter()
        .map(|t| {
            vec![
                fmt_date(t.due_date),
                t.description.clone(),
                fmt_money(t.amount, &settings.currency_symbol),
                t.contact.clone().unwrap_or_default(),
            ]
        })
        .collect();
    if rows.is_empty() {
        println!("Nothing due in the next {} day(s).", days);
    } else {
        println!(
            "{}",
            pretty_table(&["Due", "Description", "Amount", "Contact"], rows)
        );
    }
    Ok(())
}
