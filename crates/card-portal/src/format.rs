//! Display helpers: currency, dates, masking of sensitive fields.
//!
//! Everything here is total. Input that cannot be formatted comes back
//! unchanged, or as a neutral default where there is nothing to echo.

use std::fmt::{self, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::ApplicationStatus;

pub const DEFAULT_DATE_PATTERN: &str = "%b %d, %Y";
pub const DEFAULT_DATETIME_PATTERN: &str = "%b %d, %Y %H:%M";

const RUPEE: char = '₹';
const PAN_FILLER: &str = "XXXXXX";
const PHONE_PREFIX: &str = "+91XXXXXX";

/// Rupee amount rounded to whole rupees with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{RUPEE}0");
    }

    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}{RUPEE}{}", group_indian(&digits))
}

/// Same output as [`format_currency`] for whole-rupee amounts.
pub fn format_rupees(amount: u64) -> String {
    format!("{RUPEE}{}", group_indian(&amount.to_string()))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

fn pattern_is_valid(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

fn render(formatted: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{formatted}").ok().map(|_| out)
}

pub fn format_date(date: NaiveDate) -> String {
    format_date_with(date, DEFAULT_DATE_PATTERN)
}

/// Formats with a strftime pattern. Patterns that are invalid, or that ask for
/// fields a plain date does not have, fall back to the default.
pub fn format_date_with(date: NaiveDate, pattern: &str) -> String {
    pattern_is_valid(pattern)
        .then(|| render(date.format_with_items(StrftimeItems::new(pattern))))
        .flatten()
        .unwrap_or_else(|| date.format(DEFAULT_DATE_PATTERN).to_string())
}

pub fn format_datetime_with(timestamp: NaiveDateTime, pattern: &str) -> String {
    pattern_is_valid(pattern)
        .then(|| render(timestamp.format_with_items(StrftimeItems::new(pattern))))
        .flatten()
        .unwrap_or_else(|| timestamp.format(DEFAULT_DATETIME_PATTERN).to_string())
}

/// Accepts `YYYY-MM-DD` or RFC 3339 text; anything else is echoed back.
pub fn format_date_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return format_date(date);
    }
    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(timestamp) => format_date(timestamp.date_naive()),
        Err(_) => raw.to_string(),
    }
}

/// Shows only the last four characters of a PAN behind a fixed filler.
pub fn mask_pan(pan: &str) -> String {
    let chars: Vec<char> = pan.chars().collect();
    if chars.len() < 4 {
        return pan.to_string();
    }
    let last_four: String = chars[chars.len() - 4..].iter().collect();
    format!("{PAN_FILLER}{last_four}")
}

/// Keeps the first and last character of the local part; short local parts are left alone.
pub fn mask_email(email: &str) -> String {
    let Some((username, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    if username.is_empty() || domain.is_empty() {
        return email.to_string();
    }

    let chars: Vec<char> = username.chars().collect();
    let masked = if chars.len() > 2 {
        let mut masked = String::with_capacity(username.len());
        masked.push(chars[0]);
        masked.extend(std::iter::repeat('*').take(chars.len() - 2));
        masked.push(chars[chars.len() - 1]);
        masked
    } else {
        username.to_string()
    };
    format!("{masked}@{domain}")
}

pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 10 {
        return phone.to_string();
    }
    let last_four: String = digits[digits.len() - 4..].iter().collect();
    format!("{PHONE_PREFIX}{last_four}")
}

/// Canonical `+91` form for display. Only two shapes are recognised: exactly
/// 10 digits, or exactly 12 digits starting with `91`. Any other input,
/// including `91…` at other lengths, is returned as typed.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("+91{digits}"),
        12 if digits.starts_with("91") => format!("+{digits}"),
        _ => phone.to_string(),
    }
}

/// Greeting name derived from the account email.
pub fn display_name_from_email(email: &str) -> String {
    let username = email.split('@').next().unwrap_or_default();
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "User".to_string(),
    }
}

pub fn status_badge(status: ApplicationStatus) -> String {
    format!("{} {}", status.icon(), status.label())
}

/// Indicative limit shown next to a declared income before the server decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditLimitEstimate {
    Fixed(u64),
    Subjective,
}

impl CreditLimitEstimate {
    pub fn describe(self) -> String {
        match self {
            CreditLimitEstimate::Fixed(limit) => format_rupees(limit),
            CreditLimitEstimate::Subjective => "Subjective".to_string(),
        }
    }
}

/// (maximum annual income, limit) pairs, checked in order.
const CREDIT_LIMIT_BANDS: [(u64, u64); 3] = [
    (200_000, 50_000),
    (300_000, 75_000),
    (500_000, 100_000),
];

pub fn credit_limit_for_income(annual_income: u64) -> CreditLimitEstimate {
    CREDIT_LIMIT_BANDS
        .iter()
        .find(|(max_income, _)| annual_income <= *max_income)
        .map(|(_, limit)| CreditLimitEstimate::Fixed(*limit))
        .unwrap_or(CreditLimitEstimate::Subjective)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn currency_uses_indian_grouping() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1000.0), "₹1,000");
        assert_eq!(format_currency(50_000.0), "₹50,000");
        assert_eq!(format_currency(500_000.0), "₹5,00,000");
        assert_eq!(format_currency(12_345_678.0), "₹1,23,45,678");
        assert_eq!(format_rupees(100_000_000), "₹10,00,00,000");
    }

    #[test]
    fn currency_rounds_and_handles_odd_input() {
        assert_eq!(format_currency(1499.5), "₹1,500");
        assert_eq!(format_currency(1499.4), "₹1,499");
        assert_eq!(format_currency(-2500.0), "-₹2,500");
        assert_eq!(format_currency(f64::NAN), "₹0");
    }

    #[test]
    fn dates_default_to_month_abbrev_day_year() {
        assert_eq!(format_date(date(2025, 6, 5)), "Jun 05, 2025");
        assert_eq!(format_date_with(date(2025, 6, 5), "%d/%m/%Y"), "05/06/2025");
        assert_eq!(format_date_with(date(2025, 6, 5), "%Q"), "Jun 05, 2025");
        assert_eq!(format_date_with(date(2025, 6, 5), "%H:%M"), "Jun 05, 2025");
    }

    #[test]
    fn date_strings_are_parsed_or_echoed() {
        assert_eq!(format_date_str("1990-04-12"), "Apr 12, 1990");
        assert_eq!(format_date_str("2025-06-01T10:00:00Z"), "Jun 01, 2025");
        assert_eq!(format_date_str("not a date"), "not a date");
    }

    #[test]
    fn pan_mask_keeps_last_four() {
        assert_eq!(mask_pan("ABCDE1234F"), "XXXXXX234F");
        assert!(!mask_pan("ABCDE1234F").contains("ABCDE"));
        assert_eq!(mask_pan("ABC"), "ABC");
        assert_eq!(mask_pan(""), "");
    }

    #[test]
    fn email_mask_hides_middle_of_local_part() {
        assert_eq!(mask_email("john@x.com"), "j**n@x.com");
        assert_eq!(mask_email("jo@x.com"), "jo@x.com");
        assert_eq!(mask_email("j@x.com"), "j@x.com");
        assert_eq!(mask_email("not-an-email"), "not-an-email");
        assert_eq!(mask_email("@x.com"), "@x.com");
        assert_eq!(mask_email(""), "");
    }

    #[test]
    fn phone_mask_keeps_last_four_digits() {
        assert_eq!(mask_phone("+919876543210"), "+91XXXXXX3210");
        assert_eq!(mask_phone("98765 43210"), "+91XXXXXX3210");
        assert_eq!(mask_phone("12345"), "12345");
        assert_eq!(mask_phone(""), "");
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("9876543210"), "+919876543210");
        assert_eq!(normalize_phone("91 98765 43210"), "+919876543210");
        assert_eq!(normalize_phone("9198765432"), "+919198765432");
        assert_eq!(normalize_phone("12345"), "12345");
        assert_eq!(normalize_phone("91987654321"), "91987654321");
        assert_eq!(normalize_phone("9198765432100"), "9198765432100");
    }

    #[test]
    fn display_name_falls_back_to_user() {
        assert_eq!(display_name_from_email("asha@example.com"), "Asha");
        assert_eq!(display_name_from_email(""), "User");
        assert_eq!(display_name_from_email("@example.com"), "User");
    }

    #[test]
    fn credit_limit_bands() {
        assert_eq!(
            credit_limit_for_income(150_000),
            CreditLimitEstimate::Fixed(50_000)
        );
        assert_eq!(
            credit_limit_for_income(200_000),
            CreditLimitEstimate::Fixed(50_000)
        );
        assert_eq!(
            credit_limit_for_income(200_001),
            CreditLimitEstimate::Fixed(75_000)
        );
        assert_eq!(
            credit_limit_for_income(500_000),
            CreditLimitEstimate::Fixed(100_000)
        );
        assert_eq!(
            credit_limit_for_income(500_001),
            CreditLimitEstimate::Subjective
        );
        assert_eq!(credit_limit_for_income(250_000).describe(), "₹75,000");
    }

    #[test]
    fn status_badges() {
        assert_eq!(status_badge(ApplicationStatus::Approved), "✓ Approved");
        assert_eq!(status_badge(ApplicationStatus::Pending), "⏳ Pending");
    }
}
