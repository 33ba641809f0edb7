use serde_json::{Map, Value};

use objson_types::{PrimitiveKind, PropertyValue, TypeError, TypeTag};

/// A Rust type usable as a plain property value.
///
/// `from_value` receives a value the codec has already coerced towards
/// [`type_tag`](Self::type_tag); it only has to accept the matching variant
/// (plus lossless neighbours such as `UInt` for a signed integer).
pub trait PropertyType: Sized + 'static {
    fn type_tag() -> TypeTag;

    fn into_value(self) -> PropertyValue;

    fn from_value(value: PropertyValue) -> Result<Self, TypeError>;
}

fn mismatch<T>(expected: &'static str, found: &PropertyValue) -> Result<T, TypeError> {
    Err(TypeError::Mismatch {
        expected,
        found: found.kind_name(),
    })
}

impl PropertyType for bool {
    fn type_tag() -> TypeTag {
        TypeTag::Primitive(PrimitiveKind::Bool)
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Bool(self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::Bool(b) => Ok(b),
            other => mismatch("bool", &other),
        }
    }
}

macro_rules! signed_property {
    ($($ty:ty),+) => {$(
        impl PropertyType for $ty {
            fn type_tag() -> TypeTag {
                TypeTag::Primitive(PrimitiveKind::Int)
            }

            fn into_value(self) -> PropertyValue {
                PropertyValue::Int(self as i64)
            }

            fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
                let out_of_range = |v: String| TypeError::OutOfRange {
                    value: v,
                    target: stringify!($ty),
                };
                match value {
                    PropertyValue::Int(i) => <$ty>::try_from(i).map_err(|_| out_of_range(i.to_string())),
                    PropertyValue::UInt(u) => <$ty>::try_from(u).map_err(|_| out_of_range(u.to_string())),
                    other => mismatch(stringify!($ty), &other),
                }
            }
        }
    )+};
}

macro_rules! unsigned_property {
    ($($ty:ty),+) => {$(
        impl PropertyType for $ty {
            fn type_tag() -> TypeTag {
                TypeTag::Primitive(PrimitiveKind::UInt)
            }

            fn into_value(self) -> PropertyValue {
                PropertyValue::UInt(self as u64)
            }

            fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
                let out_of_range = |v: String| TypeError::OutOfRange {
                    value: v,
                    target: stringify!($ty),
                };
                match value {
                    PropertyValue::UInt(u) => <$ty>::try_from(u).map_err(|_| out_of_range(u.to_string())),
                    PropertyValue::Int(i) => <$ty>::try_from(i).map_err(|_| out_of_range(i.to_string())),
                    other => mismatch(stringify!($ty), &other),
                }
            }
        }
    )+};
}

signed_property!(i8, i16, i32, i64, isize);
unsigned_property!(u8, u16, u32, u64, usize);

impl PropertyType for f64 {
    fn type_tag() -> TypeTag {
        TypeTag::Primitive(PrimitiveKind::Float)
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Float(self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::Float(f) => Ok(f),
            PropertyValue::Int(i) => Ok(i as f64),
            PropertyValue::UInt(u) => Ok(u as f64),
            other => mismatch("f64", &other),
        }
    }
}

impl PropertyType for f32 {
    fn type_tag() -> TypeTag {
        TypeTag::Primitive(PrimitiveKind::Float)
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Float(f64::from(self))
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl PropertyType for String {
    fn type_tag() -> TypeTag {
        TypeTag::Primitive(PrimitiveKind::String)
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::String(self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::String(s) | PropertyValue::Opaque(s) => Ok(s),
            other => mismatch("string", &other),
        }
    }
}

/// Raw bytes are a binary blob (Base64 on the wire).
impl PropertyType for Vec<u8> {
    fn type_tag() -> TypeTag {
        TypeTag::BinaryBlob
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Bytes(self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::Bytes(b) => Ok(b),
            other => mismatch("bytes", &other),
        }
    }
}

impl PropertyType for Vec<String> {
    fn type_tag() -> TypeTag {
        TypeTag::StringList
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::StringList(self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::StringList(items) => Ok(items),
            PropertyValue::List(items) => items
                .into_iter()
                .map(String::from_value)
                .collect(),
            other => mismatch("string list", &other),
        }
    }
}

macro_rules! sequence_property {
    ($($ty:ty),+) => {$(
        /// Generic ordered sequence, encoded structurally.
        impl PropertyType for Vec<$ty> {
            fn type_tag() -> TypeTag {
                TypeTag::Opaque
            }

            fn into_value(self) -> PropertyValue {
                PropertyValue::List(self.into_iter().map(PropertyType::into_value).collect())
            }

            fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
                match value {
                    PropertyValue::List(items) => items.into_iter().map(<$ty>::from_value).collect(),
                    other => mismatch(concat!("list of ", stringify!($ty)), &other),
                }
            }
        }
    )+};
}

sequence_property!(bool, i32, i64, u32, u64, f64);

/// Untyped slot: holds any JSON value.
impl PropertyType for Value {
    fn type_tag() -> TypeTag {
        TypeTag::Any
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Json(self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::Json(v) => Ok(v),
            other => Ok(other.to_json()),
        }
    }
}

impl PropertyType for Map<String, Value> {
    fn type_tag() -> TypeTag {
        TypeTag::JsonObject
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Json(Value::Object(self))
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::Json(Value::Object(map)) => Ok(map),
            PropertyValue::Map(flat) => Ok(flat
                .into_iter()
                .map(|(k, v)| (k, v.to_json()))
                .collect()),
            other => mismatch("json object", &other),
        }
    }
}

impl PropertyType for Vec<Value> {
    fn type_tag() -> TypeTag {
        TypeTag::JsonArray
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Json(Value::Array(self))
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::Json(Value::Array(items)) => Ok(items),
            other => mismatch("json array", &other),
        }
    }
}

/// `None` travels as JSON `null`.
impl<T: PropertyType> PropertyType for Option<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn into_value(self) -> PropertyValue {
        self.map_or(PropertyValue::Null, T::into_value)
    }

    fn from_value(value: PropertyValue) -> Result<Self, TypeError> {
        match value {
            PropertyValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Implement [`PropertyType`] for a fieldless enum with explicit integer
/// discriminants. The enum travels as its integer; key names are accepted
/// on input.
///
/// ```
/// use objson_registry::{enum_property, PropertyType, PropertyValue};
///
/// #[derive(Debug, PartialEq)]
/// enum Theme {
///     Light,
///     Dark,
/// }
///
/// enum_property!(Theme { Light = 0, Dark = 1 });
///
/// assert_eq!(Theme::Dark.into_value(), PropertyValue::Int(1));
/// assert_eq!(Theme::from_value(PropertyValue::Int(0)), Ok(Theme::Light));
/// ```
#[macro_export]
macro_rules! enum_property {
    ($ty:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        impl $crate::PropertyType for $ty {
            fn type_tag() -> $crate::TypeTag {
                const KEYS: &[(&str, i64)] = &[$((stringify!($variant), $value)),+];
                $crate::TypeTag::Primitive($crate::PrimitiveKind::Enum($crate::EnumKeys(KEYS)))
            }

            fn into_value(self) -> $crate::PropertyValue {
                $crate::PropertyValue::Int(match self {
                    $($ty::$variant => $value,)+
                })
            }

            fn from_value(value: $crate::PropertyValue) -> Result<Self, $crate::TypeError> {
                let raw: i64 = match value {
                    $crate::PropertyValue::Int(i) => i,
                    $crate::PropertyValue::UInt(u) => i64::try_from(u).map_err(|_| {
                        $crate::TypeError::UnknownEnumValue(u.to_string())
                    })?,
                    other => {
                        return Err($crate::TypeError::Mismatch {
                            expected: stringify!($ty),
                            found: other.kind_name(),
                        })
                    }
                };
                $(
                    if raw == $value {
                        return Ok($ty::$variant);
                    }
                )+
                Err($crate::TypeError::UnknownEnumValue(raw.to_string()))
            }
        }
    };
}

/// Implement [`PropertyType`] for types converted through their textual
/// form (`Display` + `FromStr`). They are [`TypeTag::Opaque`] and travel as
/// JSON strings.
#[macro_export]
macro_rules! textual_property {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::PropertyType for $ty {
            fn type_tag() -> $crate::TypeTag {
                $crate::TypeTag::Opaque
            }

            fn into_value(self) -> $crate::PropertyValue {
                $crate::PropertyValue::Opaque(self.to_string())
            }

            fn from_value(value: $crate::PropertyValue) -> Result<Self, $crate::TypeError> {
                match value {
                    $crate::PropertyValue::String(s) | $crate::PropertyValue::Opaque(s) => {
                        s.parse::<$ty>().map_err(|e| $crate::TypeError::Parse {
                            input: s.clone(),
                            target: stringify!($ty),
                            reason: e.to_string(),
                        })
                    }
                    other => Err($crate::TypeError::Mismatch {
                        expected: stringify!($ty),
                        found: other.kind_name(),
                    }),
                }
            }
        }
    )+};
}

textual_property!(
    std::net::IpAddr,
    std::net::Ipv4Addr,
    std::net::Ipv6Addr,
    std::net::SocketAddr,
);
