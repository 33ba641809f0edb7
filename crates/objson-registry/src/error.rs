use objson_types::TypeError;
use thiserror::Error;

/// Errors from property access through a registration table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// No property with this name is registered for the type.
    #[error("unknown property `{0}`")]
    Unknown(String),

    /// The property has no setter.
    #[error("property `{0}` is read-only")]
    NotWritable(String),

    /// The setter refused the value.
    #[error("property `{property}` rejected value: {source}")]
    Rejected {
        property: String,
        #[source]
        source: TypeError,
    },
}

/// Result alias for property access.
pub type PropertyResult<T> = Result<T, PropertyError>;
