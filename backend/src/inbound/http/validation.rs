//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::Error;

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}"))
        .with_details(json!({"field": field, "code": "missing_field"}))
}

pub(crate) fn require_field<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}
