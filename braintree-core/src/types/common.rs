//! Miscellaneous common types.

/// Represents any JSON value. Used for request bodies built field by field.
pub type AnyJson = serde_json::Value;
