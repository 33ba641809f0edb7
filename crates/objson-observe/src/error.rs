use objson_mapper::DecodeWarning;

/// Errors from setting a property by name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserveError {
    /// No property with this name is registered.
    #[error("unknown property `{0}`")]
    Unknown(String),

    /// The property has no setter.
    #[error("property `{0}` is read-only")]
    NotWritable(String),

    /// The value could not be converted to the property's type.
    #[error(transparent)]
    Decode(#[from] DecodeWarning),
}

/// Result alias for observe operations.
pub type ObserveResult<T> = Result<T, ObserveError>;
