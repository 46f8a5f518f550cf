//! Human-readable formatting for prices, percentages and timestamps.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use rust_decimal::Decimal;

use crate::timeframe::AxisUnit;

const LAST_UPDATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Formats a dollar amount with thousands separators and two decimals,
/// e.g. `$1,234.50`.
pub fn usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&format!("{:.2}", rounded.abs())))
}

/// Formats a percent change with an explicit sign, e.g. `+2.50%`.
pub fn percent_change(pct: Decimal) -> String {
    let rounded = pct.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("{rounded:.2}%")
    } else {
        format!("+{:.2}%", rounded.abs())
    }
}

/// Abbreviates a large dollar amount, e.g. `$67.00B`.
pub fn large_usd(amount: Decimal) -> String {
    let thresholds = [
        (Decimal::from(1_000_000_000_000u64), "T"),
        (Decimal::from(1_000_000_000u64), "B"),
        (Decimal::from(1_000_000u64), "M"),
        (Decimal::from(1_000u64), "K"),
    ];
    for (threshold, suffix) in thresholds {
        if amount >= threshold {
            return format!("${:.2}{suffix}", (amount / threshold).round_dp(2));
        }
    }
    format!("${:.2}", amount.round_dp(2))
}

/// Chart axis label for an epoch-millisecond timestamp in local time.
pub fn axis_label(timestamp_ms: i64, unit: AxisUnit) -> String {
    axis_label_in(timestamp_ms, unit, &Local)
}

/// Chart axis label in an explicit time zone.
pub fn axis_label_in<Tz>(timestamp_ms: i64, unit: AxisUnit, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(utc) => utc
            .with_timezone(tz)
            .format(unit.label_format())
            .to_string(),
        None => "--".to_string(),
    }
}

/// Full local date and time of the last successful update.
pub fn last_update(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format(LAST_UPDATE_FORMAT)
            .to_string(),
        None => "--".to_string(),
    }
}

/// Inserts `,` every three digits of the integer part of `digits`.
fn group_thousands(digits: &str) -> String {
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn usd_two_decimals() {
        assert_eq!(usd(dec!(100.5)), "$100.50");
        assert_eq!(usd(dec!(0)), "$0.00");
        assert_eq!(usd(dec!(0.004)), "$0.00");
    }

    #[test]
    fn usd_groups_thousands() {
        assert_eq!(usd(dec!(1234.567)), "$1,234.57");
        assert_eq!(usd(dec!(1234567)), "$1,234,567.00");
        assert_eq!(usd(dec!(-98765.4)), "-$98,765.40");
    }

    #[test]
    fn percent_change_is_signed() {
        assert_eq!(percent_change(dec!(2.5)), "+2.50%");
        assert_eq!(percent_change(dec!(-1)), "-1.00%");
        assert_eq!(percent_change(dec!(0)), "+0.00%");
        assert_eq!(percent_change(dec!(-0.001)), "+0.00%");
    }

    #[test]
    fn large_usd_suffixes() {
        assert_eq!(large_usd(dec!(2345678901)), "$2.35B");
        assert_eq!(large_usd(dec!(67000000000)), "$67.00B");
        assert_eq!(large_usd(dec!(1500000000000)), "$1.50T");
        assert_eq!(large_usd(dec!(2500000)), "$2.50M");
        assert_eq!(large_usd(dec!(1000)), "$1.00K");
        assert_eq!(large_usd(dec!(999.999)), "$1000.00");
        assert_eq!(large_usd(dec!(12.3)), "$12.30");
    }

    #[test]
    fn axis_labels_follow_unit() {
        // 2024-01-15T12:34:56Z
        let ts = 1_705_322_096_000;
        assert_eq!(axis_label_in(ts, AxisUnit::Minute, &Utc), "12:34:56");
        assert_eq!(axis_label_in(ts, AxisUnit::Hour, &Utc), "12:34");
        assert_eq!(axis_label_in(ts, AxisUnit::Day, &Utc), "15/01");
    }

    #[test]
    fn out_of_range_timestamp() {
        assert_eq!(axis_label_in(i64::MAX, AxisUnit::Hour, &Utc), "--");
    }
}
