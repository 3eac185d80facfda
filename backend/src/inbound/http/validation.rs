//! Shared validation helpers for inbound HTTP adapters.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
        }
    }
}

fn validation_error(field: &str, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let mut details = json!({
        "field": field,
        "code": code.as_str(),
    });
    if let (Some(object), Some(value)) = (details.as_object_mut(), value) {
        object.insert("value".to_owned(), json!(value));
    }
    Error::invalid_request(message).with_details(details)
}

/// Error for a required field that was absent from the payload.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    validation_error(
        field,
        format!("{field} is required"),
        ErrorCode::MissingField,
        None,
    )
}

/// Parse a UUID path or payload value, reporting the offending field.
pub(crate) fn parse_uuid(value: String, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| {
        validation_error(
            field,
            format!("{field} must be a valid UUID"),
            ErrorCode::InvalidUuid,
            Some(&value),
        )
    })
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`), reporting the field.
pub(crate) fn parse_date(value: String, field: &'static str) -> Result<NaiveDate, Error> {
    value.parse().map_err(|_| {
        validation_error(
            field,
            format!("{field} must be an ISO-8601 calendar date"),
            ErrorCode::InvalidDate,
            Some(&value),
        )
    })
}
