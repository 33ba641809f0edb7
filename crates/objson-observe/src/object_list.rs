use std::fmt;
use std::sync::mpsc::Receiver;

use serde_json::Value;

use objson_mapper::{json_kind, DecodeWarning, MergeReport, ObjectMapper};
use objson_registry::Registered;
use objson_types::{FlatMap, IgnoredSet, JsonObject, TypeTag};

use crate::notify::{ChangeNotifier, PropertyChanged};

/// An owned list of nested objects kept in two forms: the live instances
/// and their encoded JSON objects (the wire form).
///
/// Every mutation re-encodes the wire form from the instances and sends
/// one change notification, so the two forms agree whenever a call
/// returns. Replacing the wire form rebuilds the instances from it.
///
/// Register it on the parent as an object list:
///
/// ```ignore
/// Property::object_list("markers", |p: &Prefs| p.markers.items(), |p, v| p.markers.set_items(v))
/// ```
pub struct ObjectList<C> {
    name: &'static str,
    items: Vec<C>,
    wire: Vec<Value>,
    notifier: ChangeNotifier,
}

impl<C: Registered + Default> ObjectList<C> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            items: Vec::new(),
            wire: Vec::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[C] {
        &self.items
    }

    pub fn wire(&self) -> &[Value] {
        &self.wire
    }

    pub fn subscribe(&mut self) -> Receiver<PropertyChanged> {
        self.notifier.subscribe()
    }

    /// Flat-map projection of the instance at `index`.
    pub fn get_at(&self, index: usize) -> Option<FlatMap> {
        self.items.get(index).map(project)
    }

    /// Merge `map` into the existing instance at `index`. `None` if out of
    /// range.
    pub fn set_at(&mut self, index: usize, map: &FlatMap) -> Option<MergeReport> {
        let item = self.items.get_mut(index)?;
        let report = ObjectMapper::merge_from_flat_map(item, map);
        self.changed();
        Some(report)
    }

    /// Construct a new instance from `map` and add it at the end.
    pub fn append(&mut self, map: &FlatMap) -> MergeReport {
        self.insert(self.items.len(), map)
    }

    /// Construct a new instance from `map` and put it at `index`, or at the
    /// end if `index` is past it.
    pub fn insert(&mut self, index: usize, map: &FlatMap) -> MergeReport {
        let mut item = C::default();
        let report = ObjectMapper::merge_from_flat_map(&mut item, map);
        self.items.insert(index.min(self.items.len()), item);
        self.changed();
        report
    }

    /// Remove and drop the instance at `index`. Returns `false` if out of
    /// range.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        let removed = self.items.remove(index);
        self.changed();
        drop(removed);
        true
    }

    pub fn clear(&mut self) {
        let removed = std::mem::take(&mut self.items);
        self.changed();
        drop(removed);
    }

    /// Position of the first instance whose flat-map projection equals
    /// `map`. Values are compared in JSON form, so `Int(1)` matches
    /// `UInt(1)`.
    pub fn index_of(&self, map: &FlatMap) -> Option<usize> {
        let wanted = flat_json(map);
        self.items
            .iter()
            .position(|item| flat_json(&project(item)) == wanted)
    }

    pub fn contains(&self, map: &FlatMap) -> bool {
        self.index_of(map).is_some()
    }

    /// Replace all instances.
    pub fn set_items(&mut self, items: Vec<C>) {
        let previous = std::mem::replace(&mut self.items, items);
        self.changed();
        drop(previous);
    }

    /// Replace the wire form and rebuild the instances from it. Elements
    /// that are not objects are dropped with a warning, so afterwards the
    /// wire form holds only what the instances encode to.
    pub fn set_wire(&mut self, wire: Vec<Value>) -> Vec<DecodeWarning> {
        let mut warnings = Vec::new();
        let mut items = Vec::with_capacity(wire.len());
        for (index, value) in wire.iter().enumerate() {
            let path = format!("{}[{index}]", self.name);
            let Value::Object(map) = value else {
                warnings.push(DecodeWarning::TypeMismatch {
                    property: path,
                    expected: TypeTag::NestedObject,
                    found: json_kind(value),
                });
                continue;
            };
            let mut item = C::default();
            let report = ObjectMapper::merge_from(&mut item, map);
            warnings.extend(report.warnings.into_iter().map(|w| w.nested(&path)));
            items.push(item);
        }
        self.set_items(items);
        warnings
    }

    fn changed(&mut self) {
        self.wire = self.items.iter().map(encode).collect();
        self.notifier.notify(self.name);
    }
}

fn encode<C: Registered>(item: &C) -> Value {
    ObjectMapper::to_converted_value(item, &IgnoredSet::default())
}

fn project<C: Registered>(item: &C) -> FlatMap {
    ObjectMapper::to_flat_map(item, &IgnoredSet::default())
}

fn flat_json(map: &FlatMap) -> JsonObject {
    map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
}

impl<C: fmt::Debug> fmt::Debug for ObjectList<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectList")
            .field("name", &self.name)
            .field("items", &self.items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use objson_types::PropertyValue;
    use serde_json::json;

    use super::*;
    use crate::fixtures::{Marker, Prefs};

    fn map(pairs: &[(&str, PropertyValue)]) -> FlatMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn markers() -> ObjectList<Marker> {
        ObjectList::new("markers")
    }

    #[test]
    fn append_keeps_forms_in_step() {
        let mut list = markers();
        let before = list.count();
        list.append(&map(&[("x", PropertyValue::Int(1))]));

        assert_eq!(list.count(), before + 1);
        assert_eq!(
            list.get_at(list.count() - 1),
            Some(map(&[
                ("x", PropertyValue::Int(1)),
                ("label", PropertyValue::from("")),
            ]))
        );
        assert_eq!(list.wire().len(), list.count());
        assert_eq!(list.wire()[0], json!({"x": 1, "label": ""}));
    }

    #[test]
    fn set_at_merges_into_existing_instance() {
        let mut list = markers();
        list.append(&map(&[("x", PropertyValue::Int(1)), ("label", "a".into())]));
        let report = list.set_at(0, &map(&[("x", PropertyValue::Int(5))])).unwrap();
        assert!(report.is_clean());
        assert_eq!(
            list.items(),
            [Marker {
                x: 5,
                label: "a".into()
            }]
        );
        assert_eq!(list.wire()[0], json!({"x": 5, "label": "a"}));
        assert!(list.set_at(3, &FlatMap::new()).is_none());
    }

    #[test]
    fn insert_remove_clear() {
        let mut list = markers();
        list.append(&map(&[("x", PropertyValue::Int(1))]));
        list.insert(0, &map(&[("x", PropertyValue::Int(0))]));
        list.insert(99, &map(&[("x", PropertyValue::Int(2))]));
        let xs: Vec<_> = list.items().iter().map(|m| m.x).collect();
        assert_eq!(xs, [0, 1, 2]);

        assert!(list.remove(1));
        assert!(!list.remove(7));
        assert_eq!(list.wire(), [json!({"x": 0, "label": ""}), json!({"x": 2, "label": ""})]);

        list.clear();
        assert!(list.is_empty());
        assert!(list.wire().is_empty());
    }

    #[test]
    fn index_of_compares_flat_projections() {
        let mut list = markers();
        list.append(&map(&[("x", PropertyValue::Int(1)), ("label", "a".into())]));
        list.append(&map(&[("x", PropertyValue::Int(2)), ("label", "b".into())]));

        let probe = map(&[("x", PropertyValue::UInt(2)), ("label", "b".into())]);
        assert_eq!(list.index_of(&probe), Some(1));
        assert!(!list.contains(&map(&[("x", PropertyValue::Int(2))])));
    }

    #[test]
    fn every_mutation_notifies_once() {
        let mut list = markers();
        let changes = list.subscribe();
        list.append(&FlatMap::new());
        list.set_at(0, &FlatMap::new());
        list.remove(0);
        list.remove(0);
        list.clear();
        assert_eq!(changes.try_iter().count(), 4);
    }

    #[test]
    fn set_wire_rebuilds_instances() {
        let mut list = markers();
        list.append(&map(&[("x", PropertyValue::Int(9))]));

        let warnings = list.set_wire(vec![
            json!({"x": 3}),
            json!("junk"),
            json!({"x": "three", "label": "c"}),
        ]);
        let paths: Vec<_> = warnings.iter().map(DecodeWarning::property).collect();
        assert_eq!(paths, ["markers[1]", "markers[2].x"]);
        assert_eq!(
            list.items(),
            [
                Marker {
                    x: 3,
                    label: String::new()
                },
                Marker {
                    x: 0,
                    label: "c".into()
                },
            ]
        );
        assert_eq!(list.wire(), [json!({"x": 3, "label": ""}), json!({"x": 0, "label": "c"})]);
    }

    #[test]
    fn registered_as_parent_property() {
        let mut prefs = Prefs::default();
        ObjectMapper::merge_from_json_value(
            &mut prefs,
            &json!({"markers": [{"x": 1, "label": "one"}, {"x": 2}]}),
        );
        assert_eq!(prefs.markers.count(), 2);
        assert_eq!(prefs.markers.wire().len(), 2);

        let encoded = ObjectMapper::to_json_object(&prefs, &IgnoredSet::default());
        assert_eq!(Value::Array(prefs.markers.wire().to_vec()), encoded["markers"]);
    }
}
