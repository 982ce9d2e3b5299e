//! Boundary checks for loosely-typed entity references
//!
//! References arrive from routing parameters and from previous query
//! results as JSON objects that may carry any number of extra fields.
//! [`check_is_entity_ref`] verifies the two fields that matter.

use serde_json::Value;

/// Malformed entity reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityRefError {
    /// Reference was null or not an object
    #[error("entity reference must be an object, got {0}")]
    NotAnObject(String),

    /// `kind` field absent or null
    #[error("entity reference has no kind")]
    MissingKind,

    /// `kind` field present but blank
    #[error("entity reference kind cannot be empty")]
    EmptyKind,

    /// `kind` field is not a string
    #[error("entity reference kind must be a string, got {0}")]
    InvalidKind(String),

    /// `id` field absent or null
    #[error("entity reference has no id")]
    MissingId,

    /// `id` field is not an integer
    #[error("entity reference id must be an integer, got {0}")]
    InvalidId(String),

    /// Lifecycle status name not recognised
    #[error("unknown entity lifecycle status: '{0}'")]
    UnknownLifecycleStatus(String),
}

/// Verify that `value` is a well-formed entity reference
///
/// A well-formed reference is an object with a non-blank string `kind`
/// and an integer `id`. Other fields are ignored. The kind is returned
/// exactly as given.
///
/// # Returns
/// The `(kind, id)` pair borrowed from `value`.
///
/// # Errors
/// [`EntityRefError`] naming the first problem found.
pub fn check_is_entity_ref(value: &Value) -> Result<(&str, i64), EntityRefError> {
    let object = value
        .as_object()
        .ok_or_else(|| EntityRefError::NotAnObject(describe(value)))?;

    let kind = match object.get("kind") {
        None | Some(Value::Null) => return Err(EntityRefError::MissingKind),
        Some(Value::String(kind)) if kind.trim().is_empty() => {
            return Err(EntityRefError::EmptyKind)
        }
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => return Err(EntityRefError::InvalidKind(describe(other))),
    };

    let id = match object.get("id") {
        None | Some(Value::Null) => return Err(EntityRefError::MissingId),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| EntityRefError::InvalidId(n.to_string()))?,
        Some(other) => return Err(EntityRefError::InvalidId(describe(other))),
    };

    Ok((kind, id))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string '{s}'"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
