use std::fmt;

/// Key table of an integer-backed enum: `(name, discriminant)` pairs.
///
/// Enums travel as plain integers on the wire. The key table lets the codec
/// accept a key name (`"Dark"`) where an integer is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumKeys(pub &'static [(&'static str, i64)]);

impl EnumKeys {
    /// Discriminant for the given key name.
    pub fn value_of(&self, key: &str) -> Option<i64> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Key name for the given discriminant.
    pub fn key_of(&self, value: i64) -> Option<&'static str> {
        self.0.iter().find(|(_, v)| *v == value).map(|(k, _)| *k)
    }

    /// Whether `value` is a declared discriminant.
    pub fn contains(&self, value: i64) -> bool {
        self.key_of(value).is_some()
    }
}

/// Primitive kinds handled by generic coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    Bool,
    /// Signed integer of any width.
    Int,
    /// Unsigned integer of any width.
    UInt,
    /// Floating point of any width.
    Float,
    String,
    /// Integer-backed enum with its key table.
    Enum(EnumKeys),
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::UInt => write!(f, "uint"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Enum(_) => write!(f, "enum"),
        }
    }
}

/// Declared type of a property, used to select a conversion strategy.
///
/// Anything the codec does not specially recognise is [`TypeTag::Opaque`]
/// and goes through best-effort coercion via its textual form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeTag {
    Primitive(PrimitiveKind),
    /// Reference to another registered object.
    NestedObject,
    /// Homogeneous list of registered objects.
    NestedObjectList,
    /// Raw JSON object slot, stored as-is.
    JsonObject,
    /// Raw JSON array slot, stored as-is.
    JsonArray,
    /// Ordered list of strings.
    StringList,
    /// Opaque byte sequence, Base64 on the wire.
    BinaryBlob,
    /// Open, untyped slot: accepts any JSON value unchanged.
    Any,
    /// Not specially recognised; converted through its string form.
    Opaque,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::NestedObject => write!(f, "object"),
            Self::NestedObjectList => write!(f, "object list"),
            Self::JsonObject => write!(f, "json object"),
            Self::JsonArray => write!(f, "json array"),
            Self::StringList => write!(f, "string list"),
            Self::BinaryBlob => write!(f, "binary blob"),
            Self::Any => write!(f, "any"),
            Self::Opaque => write!(f, "opaque"),
        }
    }
}
