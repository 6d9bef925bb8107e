//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs carry raw strings; these helpers run the domain constructors
//! and turn their failures into `400 Bad Request` errors whose details name
//! the offending field.

use std::fmt::Display;

use serde_json::json;

use crate::domain::{Error, TagName};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
    InvalidTag,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidTag => "invalid_tag",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Run a domain constructor and attribute its failure to `field`.
pub(crate) fn validate<T, E: Display>(field: FieldName, result: Result<T, E>) -> Result<T, Error> {
    result.map_err(|error| {
        ValidationError::new(field.as_str(), error.to_string()).with_code(ErrorCode::InvalidValue)
    })
}

/// Validate a list of raw tag names, reporting the index of the first
/// invalid entry.
pub(crate) fn parse_tag_names<I, S>(values: I, field: FieldName) -> Result<Vec<TagName>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            TagName::new(raw.as_ref()).map_err(|error| {
                ValidationError::new(field.as_str(), error.to_string()).with_index(
                    ErrorCode::InvalidTag,
                    index,
                    raw.as_ref(),
                )
            })
        })
        .collect()
}

/// Split a comma-separated tag filter such as `?tags=rust,web`.
///
/// Empty segments are skipped so `rust,,web` and a trailing comma are
/// accepted.
pub(crate) fn parse_tag_filter(raw: &str, field: FieldName) -> Result<Vec<TagName>, Error> {
    parse_tag_names(
        raw.split(',').map(str::trim).filter(|segment| !segment.is_empty()),
        field,
    )
}
