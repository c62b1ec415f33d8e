// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Locale-aware monetary text. Input may use either `1.234,56` or `1234.56`;
//! display is always `1.234,56`.

use crate::errors::{LedgerError, LedgerResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Amounts closer than this are the same amount.
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest accepted magnitude, 10^15.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Parse user-entered or stored amount text. Empty text is zero; magnitudes
/// above `MAX_AMOUNT` are invalid.
pub fn parse_amount(text: &str) -> LedgerResult<Decimal> {
    // char::is_whitespace covers U+00A0 as well
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let normalized = match (cleaned.contains('.'), cleaned.contains(',')) {
        (true, true) => cleaned.replace('.', "").replace(',', "."),
        (false, true) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    Decimal::from_str(&normalized)
        .ok()
        .filter(|d| d.abs() <= MAX_AMOUNT)
        .ok_or_else(|| LedgerError::InvalidAmount {
            input: text.to_string(),
        })
}

/// Rounds to cents, half away from zero; the precision every stored amount has.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Display form: two fraction digits, `,` decimal separator, `.` thousands separator.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{},{}", sign, grouped, frac_part)
}

/// Storage form: plain `.` decimal, two fraction digits, signed.
pub fn storage_amount(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

pub fn fmt_money(amount: Decimal, symbol: &str) -> String {
    format!("{} {}", symbol, format_amount(amount))
}

pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < AMOUNT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_both_separator_conventions() {
        assert_eq!(parse_amount("1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_amount("14,98").unwrap(), dec("14.98"));
        assert_eq!(parse_amount("299.90").unwrap(), dec("299.90"));
        assert_eq!(parse_amount("42").unwrap(), dec("42"));
        assert_eq!(parse_amount("-7,5").unwrap(), dec("-7.5"));
    }

    #[test]
    fn strips_whitespace_including_nbsp() {
        assert_eq!(parse_amount(" 1 234,00 ").unwrap(), dec("1234.00"));
        assert_eq!(parse_amount("1\u{a0}234,00").unwrap(), dec("1234.00"));
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(parse_amount("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn garbage_is_invalid_amount() {
        let err = parse_amount("12,34,56").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn formats_with_grouping() {
        assert_eq!(format_amount(dec("1234.5")), "1.234,50");
        assert_eq!(format_amount(dec("0.5")), "0,50");
        assert_eq!(format_amount(dec("999")), "999,00");
        assert_eq!(format_amount(dec("1000000")), "1.000.000,00");
        assert_eq!(format_amount(dec("-200")), "-200,00");
        assert_eq!(format_amount(dec("2.005")), "2,01");
        assert_eq!(format_amount(Decimal::from_f64(1234.5).unwrap()), "1.234,50");
    }

    #[test]
    fn storage_form_uses_dot() {
        assert_eq!(storage_amount(dec("-1234.5")), "-1234.50");
        assert_eq!(storage_amount(dec("10")), "10.00");
    }

    #[test]
    fn tolerance_is_one_cent_exclusive() {
        assert!(amounts_match(dec("10.00"), dec("10.009")));
        assert!(!amounts_match(dec("10.00"), dec("10.01")));
    }
}
