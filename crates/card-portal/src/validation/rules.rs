use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

fn pan_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("static pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\+91)?[6-9][0-9]{9}$").expect("static pattern"))
}

fn pincode_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[1-9][0-9]{5}$").expect("static pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
        )
        .expect("static pattern")
    })
}

/// PAN: five uppercase letters, four digits, one uppercase letter. No checksum.
pub fn validate_pan(pan: &str) -> bool {
    pan_pattern().is_match(pan)
}

/// Mobile number with an optional `+91` prefix; whitespace is ignored.
pub fn validate_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    phone_pattern().is_match(&compact)
}

/// Six-digit PIN code that does not start with zero.
pub fn validate_pincode(pincode: &str) -> bool {
    pincode_pattern().is_match(pincode)
}

pub fn validate_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && email_pattern().is_match(email)
}

/// Whole years between `date_of_birth` and `today`.
///
/// One year is taken off when this year's anniversary is still ahead, so a
/// person born on 2007-06-16 is 17 on 2025-06-15. A birth date in the future
/// yields a negative age.
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    let anniversary_pending =
        (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day());
    if anniversary_pending {
        age -= 1;
    }
    age
}
