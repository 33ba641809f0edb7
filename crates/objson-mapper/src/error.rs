use objson_types::TypeTag;
use serde_json::Value;
use thiserror::Error;

/// A single property could not be converted. Never fatal: the property is
/// skipped (or, for blobs, emptied) and the rest of the object still
/// converts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeWarning {
    /// A binary blob was not valid Base64; an empty blob was stored.
    #[error("property `{property}`: malformed base64 payload, stored an empty blob")]
    MalformedBase64 { property: String },

    /// No codec path or coercion turns the JSON value into the declared type.
    #[error("property `{property}`: cannot convert {found} to {expected}")]
    TypeMismatch {
        property: String,
        expected: TypeTag,
        found: &'static str,
    },

    /// The value was converted but the property's setter refused it.
    #[error("property `{property}`: {reason}")]
    Rejected { property: String, reason: String },
}

impl DecodeWarning {
    /// Path of the offending property (`parent.child` for nested objects).
    pub fn property(&self) -> &str {
        match self {
            Self::MalformedBase64 { property }
            | Self::TypeMismatch { property, .. }
            | Self::Rejected { property, .. } => property,
        }
    }

    /// Re-root the property path under `parent`.
    pub fn nested(mut self, parent: &str) -> Self {
        let property = match &mut self {
            Self::MalformedBase64 { property }
            | Self::TypeMismatch { property, .. }
            | Self::Rejected { property, .. } => property,
        };
        *property = format!("{parent}.{property}");
        self
    }
}

/// Errors that abort a whole conversion call before any mutation.
#[derive(Debug, Error)]
pub enum MapperError {
    /// The input text is not valid JSON.
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The input parsed, but its top-level value is not an object.
    #[error("expected a JSON object at top level, found {0}")]
    NotAnObject(&'static str),
}

/// Result alias for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Short name of a JSON value's type, for diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
