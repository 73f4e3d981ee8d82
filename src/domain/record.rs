//! Ingested profile record
//!
//! A [`Record`] keeps the exact JSON object returned by the API so the
//! full-record dump is lossless. Typed accessors read the handful of fields the
//! export engine needs; any of them may be missing, `null`, or empty, and that
//! is never an error.

use super::errors::RecordError;
use super::ids::IdentityKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names inside the nested `profile` object
pub mod fields {
    pub const USER_ID: &str = "user_id";
    pub const ORGANIZATION_NAME: &str = "organization_name";
    pub const FIO: &str = "fio";
    pub const REGION: &str = "region";
    pub const ADDRESS: &str = "address";
    pub const PHONE: &str = "phone";
    pub const CITY_ID: &str = "city_id";
    pub const DIRECTION: &str = "direction";
    pub const CITY: &str = "city";
    pub const LICENSE_NUMBER: &str = "license_number";
}

/// One ingested entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Wrap a raw JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Top-level `username`, trimmed; `None` when absent or blank
    pub fn username(&self) -> Option<String> {
        scalar_text(self.0.get("username"))
    }

    /// A field of the nested `profile` object, trimmed and stringified
    ///
    /// Numbers and booleans are rendered with their JSON text so numeric ids
    /// such as `city_id` survive. Objects, arrays, `null` and blank strings
    /// yield `None`.
    pub fn profile_field(&self, field: &str) -> Option<String> {
        scalar_text(self.0.get("profile").and_then(|p| p.get(field)))
    }

    /// Derive the deduplication key
    ///
    /// `profile.user_id` wins when truthy, otherwise the top-level
    /// `username`. Blank strings, `0` and `false` are not truthy.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Unidentifiable`] when neither is usable.
    pub fn identity(&self) -> Result<IdentityKey, RecordError> {
        let user_id = self.0.get("profile").and_then(|p| p.get(fields::USER_ID));
        truthy_text(user_id)
            .or_else(|| truthy_text(self.0.get("username")))
            .and_then(|key| IdentityKey::new(key).ok())
            .ok_or(RecordError::Unidentifiable)
    }

    /// Pretty-printed JSON of the whole record
    pub fn to_pretty_json(&self) -> Result<String, RecordError> {
        serde_json::to_string_pretty(&self.0).map_err(|e| RecordError::Serialization {
            identity: self
                .identity()
                .map(IdentityKey::into_inner)
                .unwrap_or_else(|_| "<unidentified>".to_string()),
            message: e.to_string(),
        })
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => scalar_text(Some(other)),
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
