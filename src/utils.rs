// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{LedgerError, LedgerResult};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use regex::{Regex, RegexBuilder};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Calendar date from `YYYY-MM-DD`, `DD/MM/YYYY`, or a date-time (time dropped).
pub fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    let s = s.trim();
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return Ok(d);
        }
    }
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Ok(dt.date());
        }
    }
    Err(LedgerError::InvalidDate {
        input: s.to_string(),
    })
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn month_key(d: NaiveDate) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn fmt_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

/// Case-insensitive literal matcher for free-text search.
pub fn search_pattern(needle: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(needle.trim()))
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Invalid search '{}'", needle))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_in_every_stored_shape() {
        let want = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(parse_date("2025-03-09").unwrap(), want);
        assert_eq!(parse_date("09/03/2025").unwrap(), want);
        assert_eq!(parse_date("2025-03-09 00:00:00").unwrap(), want);
        assert_eq!(parse_date(" 2025-03-09T13:45:00 ").unwrap(), want);
        assert!(parse_date("March 9").is_err());
    }

    #[test]
    fn search_is_literal_and_case_insensitive() {
        let re = search_pattern("uber (eats)").unwrap();
        assert!(re.is_match("UBER (Eats) delivery"));
        assert!(!re.is_match("uber eats"));
    }

    #[test]
    fn month_helpers() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(month_key(d), "2025-01");
        assert!(parse_month("2025-13").is_err());
        assert_eq!(parse_month(" 2025-02 ").unwrap(), "2025-02");
    }
}
