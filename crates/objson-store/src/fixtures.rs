//! Registered types shared by the store tests.

use std::sync::OnceLock;

use objson_registry::{Property, PropertyTable, Registered};

use crate::facade::Persistable;

#[derive(Debug, Default, PartialEq)]
pub struct Profile {
    pub object_name: String,
    pub name: String,
    pub volume: u8,
    pub tags: Vec<String>,
    pub hook_runs: u32,
}

impl Registered for Profile {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Profile>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Profile")
                .with(Property::value(
                    "objectName",
                    |p: &Profile| p.object_name.clone(),
                    |p, v| p.object_name = v,
                ))
                .with(Property::value("name", |p: &Profile| p.name.clone(), |p, v| p.name = v))
                .with(Property::value("volume", |p: &Profile| p.volume, |p, v| p.volume = v))
                .with(Property::value("tags", |p: &Profile| p.tags.clone(), |p, v| p.tags = v))
        })
    }
}

impl Persistable for Profile {
    fn after_load(&mut self) {
        self.hook_runs += 1;
        if self.volume > 100 {
            self.volume = 100;
        }
    }
}

pub fn profile() -> Profile {
    Profile {
        object_name: "main".into(),
        name: "ada".into(),
        volume: 70,
        tags: vec!["x".into()],
        hook_runs: 0,
    }
}
