//! Conversions between the text columns SQLite stores and domain values.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a stored decimal, falling back to zero (and logging) on corrupt data.
pub(crate) fn parse_decimal(value: &str, field_name: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse {} '{}' as Decimal: {}. Falling back to ZERO.",
            field_name,
            value,
            e
        );
        Decimal::ZERO
    })
}

pub(crate) fn parse_date(value: &str, field_name: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_else(|e| {
        log::error!("Failed to parse {} '{}': {}", field_name, value, e);
        NaiveDate::default()
    })
}

/// Parses a stored enum value, falling back to `fallback` on unknown values.
pub(crate) fn parse_enum<T>(value: &str, field_name: &str, fallback: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value).unwrap_or_else(|e| {
        log::error!("Unknown {} '{}' in database: {}", field_name, value, e);
        fallback
    })
}
