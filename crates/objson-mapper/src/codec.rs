use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use objson_registry::{PropertyDescriptor, PropertyInput, PropertyRef, Reflect};
use objson_types::{FlatMap, IgnoredSet, JsonObject, PropertyValue, TypeTag};

use crate::coerce;
use crate::error::{json_kind, DecodeWarning};
use crate::mapper::ObjectMapper;

/// A converted property input, plus any non-fatal warnings raised inside it
/// (for nested objects, from their own properties).
#[derive(Debug)]
pub struct Decoded {
    pub input: PropertyInput,
    pub warnings: Vec<DecodeWarning>,
}

impl Decoded {
    fn value(value: PropertyValue) -> Self {
        Self {
            input: PropertyInput::Value(value),
            warnings: Vec::new(),
        }
    }
}

/// Type-directed conversion of single property values between native and
/// JSON form.
pub struct ValueCodec;

impl ValueCodec {
    /// Encode one property value to JSON.
    ///
    /// Nested objects are converted recursively with the default ignored
    /// set; an unset nested object becomes `{}`. Blobs become Base64 text.
    pub fn encode(property: PropertyRef<'_>, tag: &TypeTag) -> Value {
        match property {
            PropertyRef::Object(Some(object)) => encode_object(object),
            PropertyRef::Object(None) => Value::Object(JsonObject::new()),
            PropertyRef::ObjectList(items) => {
                Value::Array(items.into_iter().map(encode_object).collect())
            }
            PropertyRef::Value(PropertyValue::Bytes(bytes)) if *tag == TypeTag::BinaryBlob => {
                Value::String(STANDARD.encode(bytes))
            }
            PropertyRef::Value(value) => value.to_json(),
        }
    }

    /// Project one property value into flat-map form: nested objects become
    /// maps, object lists lists of maps, blobs Base64 strings. Everything
    /// else keeps its native value.
    pub fn flatten(property: PropertyRef<'_>, tag: &TypeTag) -> PropertyValue {
        match property {
            PropertyRef::Object(Some(object)) => flatten_object(object),
            PropertyRef::Object(None) => PropertyValue::Map(FlatMap::new()),
            PropertyRef::ObjectList(items) => {
                PropertyValue::List(items.into_iter().map(flatten_object).collect())
            }
            PropertyRef::Value(PropertyValue::Bytes(bytes)) if *tag == TypeTag::BinaryBlob => {
                PropertyValue::String(STANDARD.encode(bytes))
            }
            PropertyRef::Value(value) => value,
        }
    }

    /// Decode one JSON value for the property `descriptor` describes.
    ///
    /// Dedicated paths come first: raw JSON objects and arrays, Base64
    /// blobs, string lists from arrays and nested objects. Then generic
    /// coercion, then untyped slots take the value as-is, then a string
    /// input is re-read as text. `Err` means the property must be skipped.
    pub fn decode(
        value: &Value,
        descriptor: &PropertyDescriptor,
        current: Option<PropertyRef<'_>>,
    ) -> Result<Decoded, DecodeWarning> {
        let tag = &descriptor.type_tag;
        match (tag, value) {
            (TypeTag::JsonObject, Value::Object(_)) | (TypeTag::JsonArray, Value::Array(_)) => {
                return Ok(Decoded::value(PropertyValue::Json(value.clone())));
            }
            (TypeTag::BinaryBlob, _) => return decode_blob(descriptor.name, value),
            (TypeTag::StringList, Value::Array(items)) => {
                let items = items.iter().map(element_text).collect();
                return Ok(Decoded::value(PropertyValue::StringList(items)));
            }
            (TypeTag::NestedObject, Value::Object(map)) => return decode_object(descriptor, map),
            (TypeTag::NestedObjectList, Value::Array(items)) => {
                return Ok(decode_object_list(descriptor, items));
            }
            _ => {}
        }

        let current = current.and_then(PropertyRef::into_value);
        if let Some(native) = coerce::coerce(value, tag, current.as_ref()) {
            return Ok(Decoded::value(native));
        }
        if *tag == TypeTag::Any {
            return Ok(Decoded::value(PropertyValue::Json(value.clone())));
        }
        if let Value::String(text) = value {
            if let Some(native) = coerce::from_text(text, tag) {
                return Ok(Decoded::value(native));
            }
        }
        Err(mismatch(descriptor.name.to_string(), tag, value))
    }
}

fn encode_object(object: &dyn Reflect) -> Value {
    ObjectMapper::to_converted_value(object, &IgnoredSet::default())
}

fn flatten_object(object: &dyn Reflect) -> PropertyValue {
    PropertyValue::Map(ObjectMapper::to_flat_map(object, &IgnoredSet::default()))
}

fn mismatch(property: String, tag: &TypeTag, value: &Value) -> DecodeWarning {
    DecodeWarning::TypeMismatch {
        property,
        expected: *tag,
        found: json_kind(value),
    }
}

fn decode_blob(name: &str, value: &Value) -> Result<Decoded, DecodeWarning> {
    match value {
        Value::Null => Ok(Decoded::value(PropertyValue::Bytes(Vec::new()))),
        Value::String(text) => match STANDARD.decode(text) {
            Ok(bytes) => Ok(Decoded::value(PropertyValue::Bytes(bytes))),
            Err(_) => Ok(Decoded {
                input: PropertyInput::Value(PropertyValue::Bytes(Vec::new())),
                warnings: vec![DecodeWarning::MalformedBase64 {
                    property: name.to_string(),
                }],
            }),
        },
        other => Err(mismatch(name.to_string(), &TypeTag::BinaryBlob, other)),
    }
}

/// String-list elements: strings as-is, `null` as empty, anything else as
/// compact JSON text.
fn element_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn decode_object(descriptor: &PropertyDescriptor, map: &JsonObject) -> Result<Decoded, DecodeWarning> {
    let Some(mut child) = descriptor.new_instance() else {
        return Err(mismatch(
            descriptor.name.to_string(),
            &descriptor.type_tag,
            &Value::Null,
        ));
    };
    let report = ObjectMapper::merge_collect(child.as_mut(), map, &IgnoredSet::default());
    Ok(Decoded {
        input: PropertyInput::Object(child),
        warnings: report
            .warnings
            .into_iter()
            .map(|w| w.nested(descriptor.name))
            .collect(),
    })
}

/// Elements that are not objects are skipped with a warning; the rest of
/// the list still decodes.
fn decode_object_list(descriptor: &PropertyDescriptor, items: &[Value]) -> Decoded {
    let mut objects = Vec::with_capacity(items.len());
    let mut warnings = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let path = format!("{}[{index}]", descriptor.name);
        let (Value::Object(map), Some(mut child)) = (item, descriptor.new_instance()) else {
            warnings.push(mismatch(path, &TypeTag::NestedObject, item));
            continue;
        };
        let report = ObjectMapper::merge_collect(child.as_mut(), map, &IgnoredSet::default());
        warnings.extend(report.warnings.into_iter().map(|w| w.nested(&path)));
        objects.push(child);
    }
    Decoded {
        input: PropertyInput::ObjectList(objects),
        warnings,
    }
}
