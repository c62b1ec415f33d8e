// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! KPIs over a ledger snapshot. Everything here is pure: an empty snapshot
//! gives zero totals and empty series.

use crate::models::{Card, Transaction};
use crate::utils::{month_key, same_month};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub inflow: Decimal,
    pub outflow: Decimal, // <= 0
    pub balance: Decimal,
}

impl Totals {
    pub fn of<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Totals {
        let mut t = Totals::default();
        for tx in txs {
            if tx.amount > Decimal::ZERO {
                t.inflow += tx.amount;
            } else {
                t.outflow += tx.amount;
            }
            t.balance += tx.amount;
        }
        t
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    /// Percent of all spend in the same input.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySpend {
    pub weekday: String,
    pub total: Decimal,
    pub by_category: Vec<(String, Decimal)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub salary: Decimal,
    pub extra_income: Decimal,
    pub outflow: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySpend {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardUsage {
    pub name: String,
    pub limit: Decimal,
    pub used: Decimal,
    pub available: Decimal,
    pub due_day: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub top_n: usize,
    pub income_category: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_n: 5,
            income_category: "Salário".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub reference_date: NaiveDate,
    pub month: String,
    pub overall: Totals,
    pub current: Totals,
    pub transaction_count: usize,
    pub active_days: usize,
    pub running_balance: Vec<BalancePoint>,
    pub average_daily_balance: Decimal,
    pub average_daily_spend: Decimal,
    pub days_without_spending: usize,
    pub biggest_spending_day: Option<DaySpend>,
    pub category_breakdown: Vec<CategoryShare>,
    pub largest_category: Option<CategoryShare>,
    pub top_expenses: Vec<Transaction>,
    pub largest_expense: Option<Transaction>,
    pub extra_income: Decimal,
    pub weekday_spend: Vec<WeekdaySpend>,
    pub monthly: Vec<MonthSummary>,
    pub cards: Vec<CardUsage>,
}

impl Dashboard {
    pub fn compute(
        snapshot: &[Transaction],
        cards: &[Card],
        reference: NaiveDate,
        opts: &DashboardOptions,
    ) -> Dashboard {
        let month = current_month(snapshot, reference);
        let top = top_expenses(month.iter().copied(), opts.top_n);
        let breakdown = category_breakdown(month.iter().copied());
        let active_days = month.iter().map(|t| t.due_date).collect::<BTreeSet<_>>().len();
        Dashboard {
            reference_date: reference,
            month: month_key(reference),
            overall: Totals::of(snapshot),
            current: Totals::of(month.iter().copied()),
            transaction_count: month.len(),
            active_days,
            running_balance: running_balance(month.iter().copied(), Decimal::ZERO),
            average_daily_balance: average_daily_balance(month.iter().copied()),
            average_daily_spend: average_daily_spend(month.iter().copied()),
            days_without_spending: days_without_spending(month.iter().copied()),
            biggest_spending_day: biggest_spending_day(month.iter().copied()),
            largest_category: breakdown.first().cloned(),
            category_breakdown: breakdown,
            largest_expense: top.first().cloned(),
            top_expenses: top,
            extra_income: extra_income(month.iter().copied(), &opts.income_category),
            weekday_spend: weekday_spend(month.iter().copied()),
            monthly: monthly_summary(snapshot, &opts.income_category),
            cards: card_usage(cards, snapshot),
        }
    }
}

/// Transactions whose due date falls in the reference date's year-month.
pub fn current_month(snapshot: &[Transaction], reference: NaiveDate) -> Vec<&Transaction> {
    snapshot
        .iter()
        .filter(|t| same_month(t.due_date, reference))
        .collect()
}

/// Prefix sum of amounts in due-date order (stable), starting from `seed`.
pub fn running_balance<'a>(
    txs: impl IntoIterator<Item = &'a Transaction>,
    seed: Decimal,
) -> Vec<BalancePoint> {
    let mut sorted: Vec<&Transaction> = txs.into_iter().collect();
    sorted.sort_by_key(|t| t.due_date);
    let mut acc = seed;
    sorted
        .into_iter()
        .map(|t| {
            acc += t.amount;
            BalancePoint {
                date: t.due_date,
                description: t.description.clone(),
                amount: t.amount,
                balance: acc,
            }
        })
        .collect()
}

/// Absolute outflow per category, largest first; ties keep first appearance.
pub fn category_breakdown<'a>(
    txs: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryShare> {
    let mut order: Vec<(String, Decimal)> = Vec::new();
    for t in txs.into_iter().filter(|t| t.is_outflow()) {
        match order.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, total)) => *total += t.amount.abs(),
            None => order.push((t.category.clone(), t.amount.abs())),
        }
    }
    let grand: Decimal = order.iter().map(|(_, v)| *v).sum();
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .map(|(category, total)| CategoryShare {
            share: if grand.is_zero() {
                Decimal::ZERO
            } else {
                (total * Decimal::ONE_HUNDRED / grand).round_dp(2)
            },
            category,
            total,
        })
        .collect()
}

/// Outflows by absolute amount, descending, first `n`; ties keep input order.
pub fn top_expenses<'a>(
    txs: impl IntoIterator<Item = &'a Transaction>,
    n: usize,
) -> Vec<Transaction> {
    let mut out: Vec<&Transaction> = txs.into_iter().filter(|t| t.is_outflow()).collect();
    out.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));
    out.into_iter().take(n).cloned().collect()
}

/// Outflows per weekday of the due date, Monday first, weekdays without spend omitted.
pub fn weekday_spend<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Vec<WeekdaySpend> {
    let mut days: BTreeMap<u32, Vec<(String, Decimal)>> = BTreeMap::new();
    for t in txs.into_iter().filter(|t| t.is_outflow()) {
        let cats = days
            .entry(t.due_date.weekday().num_days_from_monday())
            .or_default();
        match cats.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, v)) => *v += t.amount.abs(),
            None => cats.push((t.category.clone(), t.amount.abs())),
        }
    }
    days.into_iter()
        .map(|(d, by_category)| WeekdaySpend {
            weekday: weekday_name(d),
            total: by_category.iter().map(|(_, v)| *v).sum(),
            by_category,
        })
        .collect()
}

fn weekday_name(days_from_monday: u32) -> String {
    let wd = match days_from_monday {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    };
    wd.to_string()
}

/// Salary (positive amounts in the income category), other income, and spend per month.
pub fn monthly_summary(snapshot: &[Transaction], income_category: &str) -> Vec<MonthSummary> {
    let mut map: BTreeMap<String, (Decimal, Decimal, Decimal)> = BTreeMap::new();
    for t in snapshot {
        let entry = map.entry(month_key(t.due_date)).or_default();
        if t.is_inflow() && t.category == income_category {
            entry.0 += t.amount;
        } else if t.is_inflow() {
            entry.1 += t.amount;
        } else {
            entry.2 += t.amount.abs();
        }
    }
    map.into_iter()
        .map(|(month, (salary, extra_income, outflow))| MonthSummary {
            month,
            salary,
            extra_income,
            outflow,
        })
        .collect()
}

pub fn extra_income<'a>(
    txs: impl IntoIterator<Item = &'a Transaction>,
    income_category: &str,
) -> Decimal {
    txs.into_iter()
        .filter(|t| t.is_inflow() && t.category != income_category)
        .map(|t| t.amount)
        .sum()
}

fn daily_net<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> BTreeMap<NaiveDate, Decimal> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in txs {
        *days.entry(t.due_date).or_default() += t.amount;
    }
    days
}

/// Mean of the end-of-day cumulative balance over days that have transactions.
pub fn average_daily_balance<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    let days = daily_net(txs);
    if days.is_empty() {
        return Decimal::ZERO;
    }
    let mut acc = Decimal::ZERO;
    let mut sum = Decimal::ZERO;
    for net in days.values() {
        acc += *net;
        sum += acc;
    }
    (sum / Decimal::from(days.len())).round_dp(2)
}

/// Absolute outflow divided by the number of distinct active days.
pub fn average_daily_spend<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    let txs: Vec<&Transaction> = txs.into_iter().collect();
    let active: BTreeSet<NaiveDate> = txs.iter().map(|t| t.due_date).collect();
    if active.is_empty() {
        return Decimal::ZERO;
    }
    let spent: Decimal = txs
        .iter()
        .filter(|t| t.is_outflow())
        .map(|t| t.amount.abs())
        .sum();
    (spent / Decimal::from(active.len())).round_dp(2)
}

/// Days between the first and last transaction date (inclusive) with no outflow.
pub fn days_without_spending<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> usize {
    let txs: Vec<&Transaction> = txs.into_iter().collect();
    let (Some(first), Some(last)) = (
        txs.iter().map(|t| t.due_date).min(),
        txs.iter().map(|t| t.due_date).max(),
    ) else {
        return 0;
    };
    let spending: BTreeSet<NaiveDate> = txs
        .iter()
        .filter(|t| t.is_outflow())
        .map(|t| t.due_date)
        .collect();
    let span = (last - first).num_days() as usize + 1;
    span - spending.len()
}

pub fn biggest_spending_day<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Option<DaySpend> {
    let days = daily_net(txs.into_iter().filter(|t| t.is_outflow()));
    // earliest day wins a tie
    days.into_iter()
        .map(|(date, net)| DaySpend {
            date,
            amount: net.abs(),
        })
        .fold(None, |best: Option<DaySpend>, d| match best {
            Some(b) if b.amount >= d.amount => Some(b),
            _ => Some(d),
        })
}

/// Unpaid outflows booked against each card (category == card name).
pub fn card_usage(cards: &[Card], snapshot: &[Transaction]) -> Vec<CardUsage> {
    cards
        .iter()
        .map(|c| {
            let used: Decimal = snapshot
                .iter()
                .filter(|t| t.category == c.name && t.is_outflow() && !t.paid_flag.is_paid())
                .map(|t| t.amount.abs())
                .sum();
            CardUsage {
                name: c.name.clone(),
                limit: c.limit,
                used,
                available: c.limit - used,
                due_day: c.due_day,
            }
        })
        .collect()
}

/// Unpaid transactions due within `[reference, reference + days]`, soonest first.
pub fn upcoming_dues(snapshot: &[Transaction], reference: NaiveDate, days: i64) -> Vec<Transaction> {
    // windows past the calendar's range run to its end
    let until = Duration::try_days(days)
        .and_then(|d| reference.checked_add_signed(d))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX });
    let mut out: Vec<Transaction> = snapshot
        .iter()
        .filter(|t| !t.paid_flag.is_paid() && t.due_date >= reference && t.due_date <= until)
        .cloned()
        .collect();
    out.sort_by_key(|t| t.due_date);
    out
}
