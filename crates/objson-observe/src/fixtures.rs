//! Registered types shared by the observe tests.

use std::sync::OnceLock;

use objson_registry::{Property, PropertyTable, Registered};
use objson_store::Persistable;

use crate::object_list::ObjectList;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Marker {
    pub x: i32,
    pub label: String,
}

impl Registered for Marker {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Marker>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Marker")
                .with(Property::value("x", |m: &Marker| m.x, |m, v| m.x = v))
                .with(Property::value("label", |m: &Marker| m.label.clone(), |m, v| m.label = v))
        })
    }
}

#[derive(Debug)]
pub struct Prefs {
    pub theme: String,
    pub volume: u8,
    pub recent: Vec<String>,
    pub version: u32,
    pub pin: String,
    pub markers: ObjectList<Marker>,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            volume: 50,
            recent: Vec::new(),
            version: 1,
            pin: String::new(),
            markers: ObjectList::new("markers"),
        }
    }
}

impl Registered for Prefs {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Prefs>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Prefs")
                .with(Property::value("theme", |p: &Prefs| p.theme.clone(), |p, v| p.theme = v))
                .with(Property::value("volume", |p: &Prefs| p.volume, |p, v| p.volume = v))
                .with(Property::value("recent", |p: &Prefs| p.recent.clone(), |p, v| p.recent = v))
                .with(Property::read_only("version", |p: &Prefs| p.version))
                .with(Property::write_only("pin", |p: &mut Prefs, v| p.pin = v))
                .with(Property::object_list("markers", |p: &Prefs| p.markers.items(), |p, v| {
                    p.markers.set_items(v)
                }))
        })
    }
}

impl Persistable for Prefs {}
