// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::dashboard::card_usage;
use crate::db::Workbook;
use crate::matcher::DeleteReport;
use crate::models::{Card, NewCard};
use crate::money::fmt_money;
use crate::session::{self, Session};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle(book: &Workbook, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let card = NewCard {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                limit: sub.get_one::<String>("limit").cloned().unwrap_or_default(),
                due_day: sub.get_one::<String>("due_day").cloned(),
            }
            .validate()?;
            session::cards(book, settings).append(&card)?;
            println!(
                "Added card '{}' with limit {}",
                card.name,
                fmt_money(card.limit, &settings.currency_symbol)
            );
        }
        Some(("list", sub)) => list(book, settings, sub)?,
        Some(("rm", sub)) => {
            let report = remove(book, settings, sub)?;
            for w in &report.warnings {
                eprintln!("warning: {}", w);
            }
            println!("Removed {} card(s)", report.deleted);
        }
        _ => {}
    }
    Ok(())
}

fn list(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let session = Session::load(book, settings, chrono::Local::now().date_naive())?;
    let usage = card_usage(&session.cards, &session.transactions);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &usage)? {
        return Ok(());
    }
    let sym = &settings.currency_symbol;
    let rows: Vec<Vec<String>> = usage
        .iter()
        .enumerate()
        .map(|(i, u)| {
            vec![
                (i + 1).to_string(),
                u.name.clone(),
                fmt_money(u.limit, sym),
                fmt_money(u.used, sym),
                fmt_money(u.available, sym),
                u.due_day.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["#", "Card", "Limit", "Used", "Available", "Due day"], rows)
    );
    Ok(())
}

pub fn remove(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<DeleteReport> {
    let mut registry = session::cards(book, settings);
    let target: Card = match sub.get_one::<usize>("index") {
        Some(i) => {
            let (cards, _) = registry.load_all()?;
            cards
                .get(i.wrapping_sub(1))
                .cloned()
                .with_context(|| format!("No card #{} in the current list", i))?
        }
        None => NewCard {
            name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
            limit: sub.get_one::<String>("limit").cloned().unwrap_or_default(),
            due_day: sub.get_one::<String>("due_day").cloned(),
        }
        .validate()?,
    };
    Ok(registry.delete(&target)?)
}
