use serde_json::Value;
use tracing::{debug, warn};

use objson_registry::{PropertyError, Reflect};
use objson_types::{FlatMap, IgnoredSet, JsonObject};

use crate::codec::{Decoded, ValueCodec};
use crate::describe::Describe;
use crate::error::{json_kind, DecodeWarning, MapperError, MapperResult};

/// Outcome of a merge. Merges never fail as a whole; properties that could
/// not be converted are listed in `warnings` and left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Properties written, in source order.
    pub applied: Vec<String>,
    /// Source keys with no matching property.
    pub unknown: Vec<String>,
    pub warnings: Vec<DecodeWarning>,
}

impl MergeReport {
    /// True when nothing was skipped for a conversion problem.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Converts whole objects to and from JSON and flat maps, property by
/// property, through their registration tables.
pub struct ObjectMapper;

impl ObjectMapper {
    /// JSON object of all readable, non-ignored properties, keyed by name
    /// in declaration order.
    pub fn to_converted_value(object: &dyn Reflect, ignored: &IgnoredSet) -> Value {
        Value::Object(Self::to_json_object(object, ignored))
    }

    pub fn to_json_object(object: &dyn Reflect, ignored: &IgnoredSet) -> JsonObject {
        let mut out = JsonObject::new();
        for descriptor in object.descriptors() {
            if !descriptor.readable || ignored.contains(descriptor.name) {
                continue;
            }
            if let Some(property) = object.get_property(descriptor.name) {
                out.insert(
                    descriptor.name.to_string(),
                    ValueCodec::encode(property, &descriptor.type_tag),
                );
            }
        }
        out
    }

    /// Compact JSON text. The same state always produces the same bytes.
    pub fn to_json_text(object: &dyn Reflect, ignored: &IgnoredSet) -> String {
        Self::to_converted_value(object, ignored).to_string()
    }

    /// Flat-map projection of all readable, non-ignored properties.
    pub fn to_flat_map(object: &dyn Reflect, ignored: &IgnoredSet) -> FlatMap {
        let mut out = FlatMap::new();
        for descriptor in object.descriptors() {
            if !descriptor.readable || ignored.contains(descriptor.name) {
                continue;
            }
            if let Some(property) = object.get_property(descriptor.name) {
                out.insert(
                    descriptor.name.to_string(),
                    ValueCodec::flatten(property, &descriptor.type_tag),
                );
            }
        }
        out
    }

    /// Merge a JSON object into `object`, ignoring `objectName`.
    pub fn merge_from(object: &mut dyn Reflect, source: &JsonObject) -> MergeReport {
        Self::merge_from_ignoring(object, source, &IgnoredSet::default())
    }

    /// Merge a JSON object into `object`. Only keys naming a writable,
    /// non-ignored property are applied; each of those is converted
    /// independently, so one bad value never blocks the others.
    pub fn merge_from_ignoring(
        object: &mut dyn Reflect,
        source: &JsonObject,
        ignored: &IgnoredSet,
    ) -> MergeReport {
        let report = Self::merge_collect(object, source, ignored);
        for warning in &report.warnings {
            warn!(
                object = object.type_name(),
                property = warning.property(),
                "{warning}"
            );
        }
        report
    }

    /// Parse `text` as a JSON object and merge it. On malformed text or a
    /// non-object top level the object is left untouched.
    pub fn merge_from_json_text(object: &mut dyn Reflect, text: &str) -> MapperResult<MergeReport> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            warn!(object = object.type_name(), error = %e, "cannot parse JSON text");
            MapperError::Parse(e)
        })?;
        match value {
            Value::Object(map) => Ok(Self::merge_from(object, &map)),
            other => Err(MapperError::NotAnObject(json_kind(&other))),
        }
    }

    /// Merge a JSON value; anything other than an object is a no-op.
    pub fn merge_from_json_value(object: &mut dyn Reflect, value: &Value) -> MergeReport {
        match value {
            Value::Object(map) => Self::merge_from(object, map),
            other => {
                debug!(
                    object = object.type_name(),
                    found = json_kind(other),
                    "not a JSON object, nothing merged"
                );
                MergeReport::default()
            }
        }
    }

    /// Merge a flat map. Values pass through their JSON form, so nested maps
    /// populate nested objects and Base64 strings populate blobs.
    pub fn merge_from_flat_map(object: &mut dyn Reflect, source: &FlatMap) -> MergeReport {
        let json: JsonObject = source
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        Self::merge_from(object, &json)
    }

    /// One-line rendering for logs, e.g. `Person({name:Ada,age:36})`.
    pub fn describe(object: &dyn Reflect) -> Describe<'_> {
        Describe::new(object)
    }

    /// The merge itself, without logging. Nested decodes use this so each
    /// warning is reported once, by the outermost merge.
    pub(crate) fn merge_collect(
        object: &mut dyn Reflect,
        source: &JsonObject,
        ignored: &IgnoredSet,
    ) -> MergeReport {
        let descriptors = object.descriptors();
        let mut report = MergeReport::default();

        for (key, value) in source {
            if ignored.contains(key) {
                continue;
            }
            let Some(descriptor) = descriptors.iter().find(|d| d.name == key) else {
                debug!(object = object.type_name(), key = %key, "no such property, skipped");
                report.unknown.push(key.clone());
                continue;
            };
            if !descriptor.writable {
                debug!(object = object.type_name(), key = %key, "read-only property, skipped");
                continue;
            }

            let current = if descriptor.readable {
                object.get_property(key)
            } else {
                None
            };
            let Decoded { input, warnings } = match ValueCodec::decode(value, descriptor, current) {
                Ok(decoded) => decoded,
                Err(warning) => {
                    report.warnings.push(warning);
                    continue;
                }
            };
            report.warnings.extend(warnings);

            match object.set_property(key, input) {
                Ok(()) => report.applied.push(key.clone()),
                Err(e) => {
                    let reason = match e {
                        PropertyError::Rejected { source, .. } => source.to_string(),
                        other => other.to_string(),
                    };
                    report.warnings.push(DecodeWarning::Rejected {
                        property: key.clone(),
                        reason,
                    });
                }
            }
        }
        report
    }
}
