// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::dashboard::{Dashboard, DashboardOptions};
use crate::db::Workbook;
use crate::money::fmt_money;
use crate::session::Session;
use crate::utils::{fmt_date, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let board = compute(book, settings, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &board)? {
        return Ok(());
    }
    render(&board, &settings.currency_symbol);
    Ok(())
}

pub fn compute(book: &Workbook, settings: &Settings, sub: &clap::ArgMatches) -> Result<Dashboard> {
    let reference = match sub.get_one::<String>("ref_date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let opts = DashboardOptions {
        top_n: sub
            .get_one::<usize>("top")
            .copied()
            .unwrap_or(settings.top_expenses),
        income_category: settings.income_category.clone(),
    };
    let session = Session::load(book, settings, reference)?;
    for issue in &session.issues {
        eprintln!("warning: {}", issue);
    }
    Ok(session.dashboard(&opts))
}

fn render(b: &Dashboard, sym: &str) {
    let money = |d: Decimal| fmt_money(d, sym);

    println!("Month {}", b.month);
    println!(
        "{}",
        pretty_table(
            &["", "Inflow", "Outflow", "Balance"],
            vec![
                vec![
                    "This month".into(),
                    money(b.current.inflow),
                    money(b.current.outflow.abs()),
                    money(b.current.balance),
                ],
                vec![
                    "All time".into(),
                    money(b.overall.inflow),
                    money(b.overall.outflow.abs()),
                    money(b.overall.balance),
                ],
            ],
        )
    );

    let biggest_day = b
        .biggest_spending_day
        .as_ref()
        .map(|d| format!("{} ({})", money(d.amount), fmt_date(d.date)))
        .unwrap_or_else(|| "-".into());
    println!(
        "{}",
        pretty_table(
            &["Indicator", "Value"],
            vec![
                vec!["Transactions".into(), b.transaction_count.to_string()],
                vec!["Active days".into(), b.active_days.to_string()],
                vec!["Average daily balance".into(), money(b.average_daily_balance)],
                vec!["Average daily spend".into(), money(b.average_daily_spend)],
                vec!["Days without spending".into(), b.days_without_spending.to_string()],
                vec!["Biggest spending day".into(), biggest_day],
                vec!["Extra income".into(), money(b.extra_income)],
                vec![
                    "Top category".into(),
                    b.largest_category
                        .as_ref()
                        .map(|c| c.category.clone())
                        .unwrap_or_else(|| "-".into()),
                ],
            ],
        )
    );

    if !b.running_balance.is_empty() {
        let rows = b
            .running_balance
            .iter()
            .map(|p| {
                vec![
                    fmt_date(p.date),
                    p.description.clone(),
                    money(p.amount),
                    money(p.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Amount", "Running balance"], rows)
        );
    }

    if b.category_breakdown.is_empty() {
        println!("No spending recorded this month.");
    } else {
        let rows = b
            .category_breakdown
            .iter()
            .map(|c| vec![c.category.clone(), money(c.total), format!("{}%", c.share)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));

        let rows = b
            .top_expenses
            .iter()
            .map(|t| {
                vec![
                    fmt_date(t.due_date),
                    t.description.clone(),
                    t.category.clone(),
                    money(t.amount.abs()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Category", "Amount"], rows)
        );

        let rows = b
            .weekday_spend
            .iter()
            .map(|w| vec![w.weekday.clone(), money(w.total)])
            .collect();
        println!("{}", pretty_table(&["Weekday", "Spent"], rows));
    }

    if !b.monthly.is_empty() {
        let rows = b
            .monthly
            .iter()
            .map(|m| {
                vec![
                    m.month.clone(),
                    money(m.salary),
                    money(m.extra_income),
                    money(m.outflow),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Salary", "Extra income", "Outflow"], rows)
        );
    }

    if !b.cards.is_empty() {
        let rows = b
            .cards
            .iter()
            .map(|c| vec![c.name.clone(), money(c.used), money(c.available)])
            .collect();
        println!("{}", pretty_table(&["Card", "Used", "Available"], rows));
    }
}
