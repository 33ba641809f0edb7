use thiserror::Error;

/// Errors produced when converting a [`PropertyValue`](crate::PropertyValue)
/// into a concrete Rust type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The value is a different kind than the target type accepts.
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The value does not fit the target type's range.
    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    /// Neither a declared key name nor a declared discriminant.
    #[error("unknown enum key or discriminant: {0}")]
    UnknownEnumValue(String),

    /// Textual conversion through `FromStr` failed.
    #[error("cannot parse {input:?} as {target}: {reason}")]
    Parse {
        input: String,
        target: &'static str,
        reason: String,
    },
}
