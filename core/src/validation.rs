//! Validation and normalization helpers.
//!
//! Membership classifiers and coerce-with-default helpers for the closed
//! enumerations, plus the field-level validators for user-supplied values.
//!
//! The coercing helpers exist for normalizing persisted or otherwise
//! external data only; invalid *user* input must surface as a
//! [`FieldError`], never be silently coerced.

use crate::types::{FieldError, ProgressStatus, RecurrenceType, ValidationReason};
use chrono::NaiveDate;

/// Maximum length of a todo name, in characters.
pub const NAME_MAX_LENGTH: u32 = 100;

/// Maximum length of a todo detail, in characters.
pub const DETAIL_MAX_LENGTH: u32 = 500;

/// Returns `true` if `value` names a known progress status.
#[must_use]
pub fn is_progress_status(value: &str) -> bool {
    parse_progress_status(value).is_some()
}

/// Returns `true` if `value` names a known recurrence type.
#[must_use]
pub fn is_recurrence_type(value: &str) -> bool {
    parse_recurrence_type(value).is_some()
}

/// Parse a progress status string, `None` for unrecognized input.
#[must_use]
pub fn parse_progress_status(value: &str) -> Option<ProgressStatus> {
    match value {
        "not_started" => Some(ProgressStatus::NotStarted),
        "in_progress" => Some(ProgressStatus::InProgress),
        "completed" => Some(ProgressStatus::Completed),
        _ => None,
    }
}

/// Parse a recurrence type string, `None` for unrecognized input.
#[must_use]
pub fn parse_recurrence_type(value: &str) -> Option<RecurrenceType> {
    match value {
        "none" => Some(RecurrenceType::None),
        "daily" => Some(RecurrenceType::Daily),
        "weekly" => Some(RecurrenceType::Weekly),
        "monthly" => Some(RecurrenceType::Monthly),
        _ => None,
    }
}

/// Coerce a persisted progress status string, falling back to
/// [`ProgressStatus::NotStarted`] for unrecognized values.
#[must_use]
pub fn progress_status_or_default(value: &str) -> ProgressStatus {
    parse_progress_status(value).unwrap_or(ProgressStatus::NotStarted)
}

/// Coerce a persisted recurrence type string, falling back to
/// [`RecurrenceType::None`] for unrecognized values.
#[must_use]
pub fn recurrence_type_or_default(value: &str) -> RecurrenceType {
    parse_recurrence_type(value).unwrap_or(RecurrenceType::None)
}

/// Validate a todo name: non-empty after trimming, at most
/// [`NAME_MAX_LENGTH`] characters.
#[must_use]
pub fn validate_name(name: &str) -> Vec<FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return vec![FieldError::new("name", ValidationReason::Required)];
    }
    if trimmed.chars().count() > NAME_MAX_LENGTH as usize {
        return vec![FieldError::max_length("name", NAME_MAX_LENGTH)];
    }
    Vec::new()
}

/// Validate a todo detail: at most [`DETAIL_MAX_LENGTH`] characters.
#[must_use]
pub fn validate_detail(detail: &str) -> Vec<FieldError> {
    if detail.chars().count() > DETAIL_MAX_LENGTH as usize {
        return vec![FieldError::max_length("detail", DETAIL_MAX_LENGTH)];
    }
    Vec::new()
}

/// Parse a strict `YYYY-MM-DD` due-date string.
///
/// # Errors
///
/// Returns a [`ValidationReason::InvalidFormat`] field error when the value
/// does not parse as a real calendar date in that exact format.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, FieldError> {
    let invalid = || FieldError::new("dueDate", ValidationReason::InvalidFormat);
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    // chrono accepts unpadded components; require the canonical rendering.
    if parsed.format("%Y-%m-%d").to_string() != value {
        return Err(invalid());
    }
    Ok(parsed)
}
