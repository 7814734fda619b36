//! Field rules shared by the inbound contact shapes.

use crate::error::AppError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("email pattern compiles")
    })
}

/// Pattern the list endpoint applies to its `email` query parameter.
fn email_filter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@]+@[^\.]+\.\w+$").expect("email filter pattern compiles"))
}

/// Length in characters, not bytes.
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min {
        return Err(AppError::validation(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    if len > max {
        return Err(AppError::validation(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

pub fn check_email(field: &str, value: &str) -> Result<(), AppError> {
    check_length(field, value, 6, 50)?;
    if !email_regex().is_match(value) {
        return Err(AppError::validation(field, "must be a valid email address"));
    }
    Ok(())
}

pub fn check_email_filter(field: &str, value: &str) -> Result<(), AppError> {
    if !email_filter_regex().is_match(value) {
        return Err(AppError::validation(field, "does not match required pattern"));
    }
    Ok(())
}

pub fn check_birthday(field: &str, value: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if value > today {
        return Err(AppError::validation(field, "must not be in the future"));
    }
    Ok(())
}
