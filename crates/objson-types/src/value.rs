use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Number, Value};

/// Loosely typed key/value projection of an object graph.
///
/// Keys are sorted, so two projections of the same state always compare and
/// iterate identically.
pub type FlatMap = BTreeMap<String, PropertyValue>;

/// An owned, loosely typed native value.
///
/// This is what property getters produce and setters accept, and the value
/// type of a [`FlatMap`]. Conversion to JSON is structural; values JSON
/// cannot express are written as their string form.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PropertyValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    StringList(Vec<String>),
    /// Generic ordered sequence.
    List(Vec<PropertyValue>),
    Map(FlatMap),
    /// Raw JSON held verbatim (JSON object/array slots and untyped slots).
    Json(Value),
    /// A value only expressible through its textual form.
    Opaque(String),
}

impl PropertyValue {
    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::StringList(_) => "string list",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Json(_) => "json",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Native-to-JSON primitive mapping.
    ///
    /// Non-finite floats become their string form (`"NaN"`, `"inf"`), bytes
    /// become standard Base64, maps become objects with sorted keys.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::UInt(u) => Value::from(*u),
            Self::Float(f) => match Number::from_f64(*f) {
                Some(n) => Value::Number(n),
                None => Value::String(f.to_string()),
            },
            Self::String(s) | Self::Opaque(s) => Value::String(s.clone()),
            Self::Bytes(bytes) => Value::String(STANDARD.encode(bytes)),
            Self::StringList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Json(v) => v.clone(),
        }
    }

    /// Natural native form of a JSON value: numbers become `Int`, `UInt`
    /// or `Float` (first that fits), arrays become lists and objects maps.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) | Self::Opaque(s) => f.write_str(s),
            Self::Bytes(bytes) => f.write_str(&STANDARD.encode(bytes)),
            Self::StringList(items) => f.write_str(&items.join(",")),
            Self::List(_) | Self::Map(_) | Self::Json(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for PropertyValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(v: Vec<String>) -> Self {
        Self::StringList(v)
    }
}

impl From<Value> for PropertyValue {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives_map_structurally() {
        assert_eq!(PropertyValue::Bool(true).to_json(), json!(true));
        assert_eq!(PropertyValue::Int(-3).to_json(), json!(-3));
        assert_eq!(PropertyValue::UInt(u64::MAX).to_json(), json!(u64::MAX));
        assert_eq!(PropertyValue::Float(1.5).to_json(), json!(1.5));
        assert_eq!(PropertyValue::from("hi").to_json(), json!("hi"));
        assert_eq!(PropertyValue::Null.to_json(), Value::Null);
    }

    #[test]
    fn non_finite_float_becomes_string() {
        assert_eq!(PropertyValue::Float(f64::NAN).to_json(), json!("NaN"));
        assert_eq!(PropertyValue::Float(f64::INFINITY).to_json(), json!("inf"));
    }

    #[test]
    fn bytes_are_base64() {
        let v = PropertyValue::Bytes(vec![0x00, 0xFF, 0x10]);
        assert_eq!(v.to_json(), json!("AP8Q"));
        assert_eq!(v.to_string(), "AP8Q");
    }

    #[test]
    fn sequences_and_maps() {
        let list = PropertyValue::List(vec![PropertyValue::Int(1), PropertyValue::from("a")]);
        assert_eq!(list.to_json(), json!([1, "a"]));

        let strings = PropertyValue::StringList(vec!["x".into(), "y".into()]);
        assert_eq!(strings.to_json(), json!(["x", "y"]));

        let mut map = FlatMap::new();
        map.insert("b".into(), PropertyValue::Int(2));
        map.insert("a".into(), PropertyValue::Int(1));
        let text = PropertyValue::Map(map).to_json().to_string();
        assert_eq!(text, r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn natural_form_of_json() {
        assert_eq!(PropertyValue::from_json(&json!(5)), PropertyValue::Int(5));
        assert_eq!(
            PropertyValue::from_json(&json!(u64::MAX)),
            PropertyValue::UInt(u64::MAX)
        );
        assert_eq!(PropertyValue::from_json(&json!(0.25)), PropertyValue::Float(0.25));

        let nested = PropertyValue::from_json(&json!({"k": [true, null]}));
        let PropertyValue::Map(map) = nested else {
            panic!("expected a map");
        };
        assert_eq!(
            map["k"],
            PropertyValue::List(vec![PropertyValue::Bool(true), PropertyValue::Null])
        );
    }

    #[test]
    fn display_is_textual() {
        assert_eq!(PropertyValue::Null.to_string(), "");
        assert_eq!(PropertyValue::Int(42).to_string(), "42");
        assert_eq!(
            PropertyValue::StringList(vec!["a".into(), "b".into()]).to_string(),
            "a,b"
        );
        assert_eq!(PropertyValue::Json(json!({"x": 1})).to_string(), r#"{"x":1}"#);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn integers_survive_json(i in any::<i64>()) {
                let v = PropertyValue::Int(i);
                prop_assert_eq!(PropertyValue::from_json(&v.to_json()), v);
            }

            #[test]
            fn strings_survive_json(s in ".*") {
                let v = PropertyValue::String(s);
                prop_assert_eq!(PropertyValue::from_json(&v.to_json()), v);
            }
        }
    }
}
