//! Business rules between the HTTP handlers and the store.
//!
//! Validation and uniqueness checks run here, before anything is written.

use crate::error::AppError;
use crate::utils::time_text::{is_valid_time_text, parse_time_text};

pub mod balance;
pub mod employee;
pub mod hours_bank;
pub mod import;
pub mod paid_day_off;
pub mod period;

/// Trimmed value of a required text field.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Blank optional text is stored as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Strictly validated "HH:MM" form field, converted to minutes.
pub(crate) fn duration_field(
    field: &'static str,
    text: &str,
    allow_negative: bool,
) -> Result<i64, AppError> {
    if !is_valid_time_text(text, allow_negative) {
        let expected = if allow_negative { "HH:MM or -HH:MM" } else { "HH:MM" };
        return Err(AppError::validation(
            field,
            format!("{field} must be formatted as {expected}"),
        ));
    }
    Ok(parse_time_text(text))
}
