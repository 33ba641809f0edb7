//! The settings document the tool edits.

use std::net::SocketAddr;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use objson_observe::ObjectList;
use objson_registry::{enum_property, Property, PropertyTable, Registered};
use objson_store::Persistable;

pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const MIN_FONT_SIZE: f64 = 6.0;
pub const MAX_FONT_SIZE: f64 = 72.0;
pub const MAX_RECENT_FILES: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

enum_property!(Theme { System = 0, Light = 1, Dark = 2 });

#[derive(Clone, Debug, PartialEq)]
pub struct Window {
    pub width: u32,
    pub height: u32,
    pub maximized: bool,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            maximized: false,
        }
    }
}

impl Registered for Window {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Window>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Window")
                .with(Property::value("width", |w: &Window| w.width, |w, v| w.width = v))
                .with(Property::value("height", |w: &Window| w.height, |w, v| w.height = v))
                .with(Property::value("maximized", |w: &Window| w.maximized, |w, v| {
                    w.maximized = v
                }))
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plugin {
    pub name: String,
    pub enabled: bool,
}

impl Registered for Plugin {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Plugin>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Plugin")
                .with(Property::value("name", |p: &Plugin| p.name.clone(), |p, v| p.name = v))
                .with(Property::value("enabled", |p: &Plugin| p.enabled, |p, v| p.enabled = v))
        })
    }
}

#[derive(Debug)]
pub struct Settings {
    pub object_name: String,
    pub language: String,
    pub theme: Theme,
    pub font_size: f64,
    pub autosave_minutes: u32,
    pub recent_files: Vec<String>,
    pub window: Option<Window>,
    pub avatar: Vec<u8>,
    pub proxy: Option<SocketAddr>,
    pub extra: Map<String, Value>,
    pub plugins: ObjectList<Plugin>,
    pub schema_version: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            object_name: "settings".into(),
            language: "en".into(),
            theme: Theme::default(),
            font_size: DEFAULT_FONT_SIZE,
            autosave_minutes: 5,
            recent_files: Vec::new(),
            window: Some(Window::default()),
            avatar: Vec::new(),
            proxy: None,
            extra: Map::new(),
            plugins: ObjectList::new("plugins"),
            schema_version: 1,
        }
    }
}

impl Registered for Settings {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Settings>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Settings")
                .with(Property::value(
                    "objectName",
                    |s: &Settings| s.object_name.clone(),
                    |s, v| s.object_name = v,
                ))
                .with(Property::value("language", |s: &Settings| s.language.clone(), |s, v| {
                    s.language = v
                }))
                .with(Property::value("theme", |s: &Settings| s.theme, |s, v| s.theme = v))
                .with(Property::value("fontSize", |s: &Settings| s.font_size, |s, v| {
                    s.font_size = v
                }))
                .with(Property::value(
                    "autosaveMinutes",
                    |s: &Settings| s.autosave_minutes,
                    |s, v| s.autosave_minutes = v,
                ))
                .with(Property::value(
                    "recentFiles",
                    |s: &Settings| s.recent_files.clone(),
                    |s, v| s.recent_files = v,
                ))
                .with(Property::object("window", |s: &Settings| s.window.as_ref(), |s, w| {
                    s.window = Some(w)
                }))
                .with(Property::value("avatar", |s: &Settings| s.avatar.clone(), |s, v| {
                    s.avatar = v
                }))
                .with(Property::value("proxy", |s: &Settings| s.proxy, |s, v| s.proxy = v))
                .with(Property::value("extra", |s: &Settings| s.extra.clone(), |s, v| s.extra = v))
                .with(Property::object_list("plugins", |s: &Settings| s.plugins.items(), |s, v| {
                    s.plugins.set_items(v)
                }))
                .with(Property::read_only("schemaVersion", |s: &Settings| s.schema_version))
        })
    }
}

impl Persistable for Settings {
    /// Keep hand-edited files within range.
    fn after_load(&mut self) {
        if !self.font_size.is_finite() {
            self.font_size = DEFAULT_FONT_SIZE;
        }
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.recent_files.truncate(MAX_RECENT_FILES);
        if self.window.is_none() {
            self.window = Some(Window::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use objson_mapper::ObjectMapper;
    use objson_types::IgnoredSet;
    use serde_json::json;

    use super::*;

    #[test]
    fn default_document_shape() {
        let encoded = ObjectMapper::to_json_object(&Settings::default(), &IgnoredSet::default());
        let keys: Vec<_> = encoded.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "language",
                "theme",
                "fontSize",
                "autosaveMinutes",
                "recentFiles",
                "window",
                "avatar",
                "proxy",
                "extra",
                "plugins",
                "schemaVersion",
            ]
        );
        assert_eq!(encoded["window"], json!({"width": 1024, "height": 768, "maximized": false}));
        assert_eq!(encoded["proxy"], Value::Null);
        assert_eq!(encoded["theme"], json!(0));
    }

    #[test]
    fn after_load_repairs_out_of_range_values() {
        let mut settings = Settings::default();
        ObjectMapper::merge_from_json_value(
            &mut settings,
            &json!({
                "fontSize": 400,
                "recentFiles": (0..15).map(|i| format!("f{i}.txt")).collect::<Vec<_>>(),
                "theme": "Dark",
                "proxy": "127.0.0.1:3128",
            }),
        );
        settings.window = None;
        settings.after_load();

        assert_eq!(settings.font_size, MAX_FONT_SIZE);
        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(settings.window, Some(Window::default()));
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.proxy, "127.0.0.1:3128".parse::<SocketAddr>().ok());
    }
}
