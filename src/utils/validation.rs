use std::borrow::Cow;

use chrono::{Datelike, Months, NaiveDate};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, FieldErrors};
use crate::model::attendance::{AttendanceStatus, DateRange};

pub const EMPLOYEE_ID_MIN: usize = 2;
pub const EMPLOYEE_ID_MAX: usize = 20;

/// Accepted shape: 2-20 ASCII letters, digits, `-` or `_`.
pub fn validate_employee_id(value: &str) -> Result<(), ValidationError> {
    let message = if value.is_empty() {
        Some("Employee ID is required.")
    } else if !(EMPLOYEE_ID_MIN..=EMPLOYEE_ID_MAX).contains(&value.chars().count()) {
        Some("Employee ID must be between 2 and 20 characters.")
    } else if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Some("Employee ID may only contain letters, digits, '-' and '_'.")
    } else {
        None
    };

    match message {
        Some(message) => {
            let mut err = ValidationError::new("employee_id");
            err.message = Some(Cow::Borrowed(message));
            Err(err)
        }
        None => Ok(()),
    }
}

/// Runs the derived validator and reports every failing field at once.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|e| AppError::Validation(fields_from(&e)))
}

pub fn fields_from(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        if let Some(first) = errs.first() {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid."));
            fields.add(field.to_string(), message);
        }
    }
    fields
}

/// Upper-cased, trimmed employee id; records an error when blank.
pub fn require_employee_id(field: &str, raw: &str, errors: &mut FieldErrors) -> Option<String> {
    let id = raw.trim().to_uppercase();
    if id.is_empty() {
        errors.add(field, "Employee ID is required.");
        None
    } else {
        Some(id)
    }
}

/// Strict `YYYY-MM-DD`.
pub fn parse_date(field: &str, raw: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, "Date is required.");
        return None;
    }
    if raw.len() != 10 {
        errors.add(field, "Date must be in YYYY-MM-DD format.");
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Invalid date value.");
            None
        }
    }
}

pub fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date(field, raw, errors),
        None => None,
    }
}

pub fn ensure_not_future(field: &str, date: NaiveDate, today: NaiveDate, errors: &mut FieldErrors) {
    if date > today {
        errors.add(field, "Date cannot be in the future.");
    }
}

pub fn parse_status(field: &str, raw: &str, errors: &mut FieldErrors) -> Option<AttendanceStatus> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, "Status is required.");
        return None;
    }
    match raw.parse::<AttendanceStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.add(field, AttendanceStatus::allowed_message());
            None
        }
    }
}

/// `YYYY-MM` -> inclusive range covering that calendar month.
pub fn parse_month(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<DateRange> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    let first = if raw.len() == 7 {
        NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
    } else {
        None
    };

    match first.and_then(|first| Some((first, month_end(first)?))) {
        Some((first, last)) => Some(DateRange::between(first, last)),
        None => {
            errors.add(field, "Month must be in YYYY-MM format.");
            None
        }
    }
}

fn month_end(first: NaiveDate) -> Option<NaiveDate> {
    debug_assert_eq!(first.day(), 1);
    first.checked_add_months(Months::new(1))?.pred_opt()
}
