//! Field-validation plumbing: the rule-to-message formatter that keeps error
//! text compatible with the existing API clients, plus the custom validator
//! functions used by the request DTOs.
//!
//! The message templates are part of the API contract, so every
//! rule maps to a fixed phrasing here rather than relying on the `validator`
//! crate's defaults.

use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use crate::response::ErrorItem;

/// Translates a structured validation failure set into `{field, message}`
/// pairs. Fields are sorted for deterministic output.
pub fn describe(errors: &ValidationErrors) -> Vec<ErrorItem> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut items = Vec::new();
    for (field, failures) in fields {
        for failure in failures {
            items.push(ErrorItem {
                field: Some(field.to_string()),
                message: message_for(field, failure),
            });
        }
    }
    items
}

fn message_for(field: &str, error: &ValidationError) -> String {
    let params = &error.params;
    match error.code.as_ref() {
        "required" => format!("{} is required", field),
        "email" => "Invalid email format".to_string(),
        "length" => {
            if let Some(equal) = param_u64(params.get("equal")) {
                return format!("{} must be exactly {} characters", field, equal);
            }
            let actual = params
                .get("value")
                .and_then(Value::as_str)
                .map(|v| v.chars().count() as u64);
            let min = param_u64(params.get("min"));
            let max = param_u64(params.get("max"));
            match (min, max, actual) {
                (Some(min), _, Some(len)) if len < min => {
                    format!("{} must be at least {} characters", field, min)
                }
                (Some(min), None, _) => format!("{} must be at least {} characters", field, min),
                (_, Some(max), _) => format!("{} must not exceed {} characters", field, max),
                _ => format!("Invalid value for {}", field),
            }
        }
        "range" => {
            let actual = params.get("value").and_then(Value::as_f64);
            let min = params.get("min").and_then(Value::as_f64);
            let max = params.get("max").and_then(Value::as_f64);
            match (min, max, actual) {
                (Some(min), _, Some(value)) if value < min => {
                    format!("{} must be at least {}", field, min)
                }
                (Some(min), None, _) => format!("{} must be at least {}", field, min),
                (_, Some(max), _) => format!("{} must not exceed {}", field, max),
                _ => format!("Invalid value for {}", field),
            }
        }
        "oneof" => {
            let options = params
                .get("options")
                .and_then(Value::as_str)
                .unwrap_or_default();
            format!("{} must be one of: {}", field, options)
        }
        "alpha" => format!("{} must contain only alphabetic characters", field),
        "alphanum" => format!("{} must contain only alphanumeric characters", field),
        "numeric" => format!("{} must be a numeric value", field),
        "url" => "Invalid URL format".to_string(),
        "uri" => "Invalid URI format".to_string(),
        "datetime" => {
            let fmt = params
                .get("format")
                .and_then(Value::as_str)
                .unwrap_or_default();
            format!("{} must be a valid datetime in format {}", field, fmt)
        }
        _ => format!("Invalid value for {}", field),
    }
}

fn param_u64(value: Option<&Value>) -> Option<u64> {
    value.and_then(Value::as_u64)
}

fn one_of(value: &str, options: &[&str]) -> Result<(), ValidationError> {
    // Empty means "not provided" for these string-typed DTO fields.
    if value.is_empty() || options.contains(&value) {
        return Ok(());
    }
    let mut error = ValidationError::new("oneof");
    error.add_param("options".into(), &options.join(", "));
    Err(error)
}

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["pending", "in_progress", "completed"])
}

pub fn validate_priority(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["low", "medium", "high"])
}

pub fn validate_sort_by(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &["created_at", "updated_at", "due_date", "priority", "title"],
    )
}

pub fn validate_sort_order(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["asc", "desc"])
}

/// Title rule for updates: an empty value means "leave unchanged" and is
/// accepted, but a provided title must still satisfy the 3–200 bounds.
pub fn validate_optional_title(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let length = value.chars().count();
    if length < 3 {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &3u64);
        error.add_param("value".into(), &value);
        return Err(error);
    }
    if length > 200 {
        let mut error = ValidationError::new("length");
        error.add_param("max".into(), &200u64);
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}
