//! Generic JSON-to-native coercion, used when no dedicated codec path
//! applies.

use objson_types::{PrimitiveKind, PropertyValue, TypeTag};
use serde_json::{Number, Value};

/// 2^63 and 2^64 as floats: the first values past `i64::MAX` and `u64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Coerce a JSON value towards a declared type.
///
/// `current` is the property's present value, if readable; for
/// [`TypeTag::Opaque`] slots it hints at the native shape. `null` passes
/// through for plain slots so optional setters can clear themselves.
/// Returns `None` when no coercion exists.
pub(crate) fn coerce(
    value: &Value,
    tag: &TypeTag,
    current: Option<&PropertyValue>,
) -> Option<PropertyValue> {
    match tag {
        TypeTag::Primitive(kind) => match value {
            Value::Null => Some(PropertyValue::Null),
            _ => coerce_primitive(value, kind),
        },
        TypeTag::StringList => match value {
            Value::Null => Some(PropertyValue::Null),
            Value::String(s) => Some(PropertyValue::StringList(vec![s.clone()])),
            _ => None,
        },
        TypeTag::Opaque => Some(natural(value, current)),
        TypeTag::NestedObject
        | TypeTag::NestedObjectList
        | TypeTag::JsonObject
        | TypeTag::JsonArray
        | TypeTag::BinaryBlob
        | TypeTag::Any => None,
    }
}

fn coerce_primitive(value: &Value, kind: &PrimitiveKind) -> Option<PropertyValue> {
    match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(b)) => Some(PropertyValue::Bool(*b)),
        (PrimitiveKind::Bool, Value::Number(n)) => {
            Some(PropertyValue::Bool(n.as_f64().is_some_and(|f| f != 0.0)))
        }

        (PrimitiveKind::Int, Value::Number(n)) => number_to_i64(n).map(PropertyValue::Int),
        (PrimitiveKind::UInt, Value::Number(n)) => number_to_u64(n).map(PropertyValue::UInt),
        (PrimitiveKind::Float, Value::Number(n)) => n.as_f64().map(PropertyValue::Float),
        (PrimitiveKind::Int, Value::Bool(b)) => Some(PropertyValue::Int(i64::from(*b))),
        (PrimitiveKind::UInt, Value::Bool(b)) => Some(PropertyValue::UInt(u64::from(*b))),
        (PrimitiveKind::Float, Value::Bool(b)) => {
            Some(PropertyValue::Float(if *b { 1.0 } else { 0.0 }))
        }

        (PrimitiveKind::String, Value::String(s)) => Some(PropertyValue::String(s.clone())),
        (PrimitiveKind::String, Value::Number(n)) => Some(PropertyValue::String(n.to_string())),
        (PrimitiveKind::String, Value::Bool(b)) => Some(PropertyValue::String(b.to_string())),

        (PrimitiveKind::Enum(_), Value::Number(n)) => number_to_i64(n).map(PropertyValue::Int),
        (PrimitiveKind::Enum(keys), Value::String(s)) => keys.value_of(s).map(PropertyValue::Int),

        _ => None,
    }
}

/// Retry coercion from a JSON string's contents, after the generic path
/// failed on the string itself.
pub(crate) fn from_text(text: &str, tag: &TypeTag) -> Option<PropertyValue> {
    let trimmed = text.trim();
    match tag {
        TypeTag::Primitive(PrimitiveKind::Bool) => parse_bool(trimmed).map(PropertyValue::Bool),
        TypeTag::Primitive(PrimitiveKind::Int) | TypeTag::Primitive(PrimitiveKind::Enum(_)) => {
            parse_number(trimmed)
                .as_ref()
                .and_then(number_to_i64)
                .map(PropertyValue::Int)
        }
        TypeTag::Primitive(PrimitiveKind::UInt) => parse_number(trimmed)
            .as_ref()
            .and_then(number_to_u64)
            .map(PropertyValue::UInt),
        TypeTag::Primitive(PrimitiveKind::Float) => {
            trimmed.parse::<f64>().ok().map(PropertyValue::Float)
        }
        TypeTag::JsonObject => match serde_json::from_str::<Value>(trimmed) {
            Ok(object @ Value::Object(_)) => Some(PropertyValue::Json(object)),
            _ => None,
        },
        TypeTag::JsonArray => match serde_json::from_str::<Value>(trimmed) {
            Ok(array @ Value::Array(_)) => Some(PropertyValue::Json(array)),
            _ => None,
        },
        _ => None,
    }
}

/// Natural native form, shaped by the current value where it says more than
/// the JSON does.
fn natural(value: &Value, current: Option<&PropertyValue>) -> PropertyValue {
    match (value, current) {
        (Value::String(s), _) => PropertyValue::Opaque(s.clone()),
        (Value::Number(n), Some(PropertyValue::Float(_))) => {
            PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN))
        }
        _ => PropertyValue::from_json(value),
    }
}

/// Round to nearest; `None` when the result does not fit.
fn number_to_i64(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return None;
    }
    let rounded = n.as_f64()?.round();
    (rounded.is_finite() && (-I64_LIMIT..I64_LIMIT).contains(&rounded)).then_some(rounded as i64)
}

fn number_to_u64(n: &Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    if n.is_i64() {
        return None;
    }
    let rounded = n.as_f64()?.round();
    (rounded.is_finite() && (0.0..U64_LIMIT).contains(&rounded)).then_some(rounded as u64)
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = text.parse::<u64>() {
        return Some(u.into());
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Some(false)
    } else {
        None
    }
}
