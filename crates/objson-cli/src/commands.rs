use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use objson_mapper::ObjectMapper;
use objson_observe::AutoPersist;
use objson_store::{Document, PersistConfig};
use objson_types::{FlatMap, IgnoredSet, PropertyValue};

use crate::cli::*;
use crate::settings::Settings;

type SettingsFile = AutoPersist<Settings>;

pub fn run_command(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let mut settings = open(&cli.file);
    if !matches!(cli.command, Command::Reset) {
        let report = settings
            .try_load()
            .with_context(|| format!("cannot load {}", cli.file.display()))?;
        debug!(
            path = %cli.file.display(),
            applied = report.applied.len(),
            unknown = report.unknown.len(),
            "settings loaded"
        );
    }
    match cli.command {
        Command::Show(args) => cmd_show(&settings, args, out),
        Command::Get(args) => cmd_get(&settings, args, out),
        Command::Set(args) => cmd_set(&mut settings, args, out),
        Command::Reset => cmd_reset(&settings, out),
        Command::Describe => {
            writeln!(out, "{}", settings.document().describe())?;
            Ok(())
        }
        Command::Plugin(args) => cmd_plugin(&mut settings, args.action, out),
    }
}

/// A missing file is a fresh document; it is only created on the first
/// change.
fn open(path: &Path) -> SettingsFile {
    let config = PersistConfig {
        missing_is_empty: true,
        ..Default::default()
    };
    AutoPersist::new(Document::new(config), path)
}

fn cmd_show(settings: &SettingsFile, args: ShowArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let ignored = if args.all {
        IgnoredSet::empty()
    } else {
        IgnoredSet::default()
    };
    if args.flat {
        for (key, value) in ObjectMapper::to_flat_map(settings.get(), &ignored) {
            writeln!(out, "{} = {}", key.bold(), value)?;
        }
    } else {
        let value = ObjectMapper::to_converted_value(settings.get(), &ignored);
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    }
    Ok(())
}

fn cmd_get(settings: &SettingsFile, args: GetArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let root = ObjectMapper::to_converted_value(settings.get(), &IgnoredSet::empty());
    let value = lookup(&root, &args.key).ok_or_else(|| anyhow!("no setting `{}`", args.key))?;
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn cmd_set(settings: &mut SettingsFile, args: SetArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let value = parse_value(&args.value);
    let (head, value) = match args.key.split_once('.') {
        None => (args.key.as_str(), value),
        Some((head, rest)) => {
            let root = ObjectMapper::to_converted_value(settings.get(), &IgnoredSet::empty());
            let mut nested = root
                .get(head)
                .cloned()
                .ok_or_else(|| anyhow!("no setting `{head}`"))?;
            let slot = lookup_mut(&mut nested, rest)
                .ok_or_else(|| anyhow!("no setting `{}`", args.key))?;
            *slot = value.to_json();
            (head, PropertyValue::Json(nested))
        }
    };

    let changed = settings
        .set_property(head, value)
        .with_context(|| format!("cannot set `{}`", args.key))?;
    if changed {
        let root = ObjectMapper::to_converted_value(settings.get(), &IgnoredSet::empty());
        let shown = lookup(&root, &args.key).cloned().unwrap_or(Value::Null);
        writeln!(out, "{} {} = {}", "✓".green().bold(), args.key.bold(), shown)?;
    } else {
        writeln!(out, "{} {} unchanged", "·".dimmed(), args.key)?;
    }
    Ok(())
}

fn cmd_reset(settings: &SettingsFile, out: &mut impl Write) -> anyhow::Result<()> {
    settings.document().try_save(settings.path())?;
    writeln!(
        out,
        "{} Reset {} to defaults",
        "✓".green().bold(),
        settings.path().display().to_string().bold()
    )?;
    Ok(())
}

fn cmd_plugin(
    settings: &mut SettingsFile,
    action: PluginAction,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        PluginAction::List => {
            let plugins = settings.get().plugins.items();
            if plugins.is_empty() {
                writeln!(out, "No plugins.")?;
            }
            for plugin in plugins {
                let mark = if plugin.enabled {
                    "●".green()
                } else {
                    "○".dimmed()
                };
                writeln!(out, "  {mark} {}", plugin.name)?;
            }
        }
        PluginAction::Add { name, disabled } => {
            if position(settings, &name).is_ok() {
                bail!("plugin `{name}` already exists");
            }
            let entry = FlatMap::from([
                ("name".to_string(), PropertyValue::from(name.as_str())),
                ("enabled".to_string(), PropertyValue::Bool(!disabled)),
            ]);
            settings.update("plugins", |s| {
                s.plugins.append(&entry);
            })?;
            writeln!(out, "{} Added plugin {}", "✓".green().bold(), name.yellow())?;
        }
        PluginAction::Remove { name } => {
            let index = position(settings, &name)?;
            settings.update("plugins", |s| {
                s.plugins.remove(index);
            })?;
            writeln!(out, "{} Removed plugin {}", "✓".green().bold(), name.yellow())?;
        }
        PluginAction::Enable { name } => toggle(settings, &name, true, out)?,
        PluginAction::Disable { name } => toggle(settings, &name, false, out)?,
    }
    Ok(())
}

fn toggle(
    settings: &mut SettingsFile,
    name: &str,
    enabled: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = position(settings, name)?;
    let patch = FlatMap::from([("enabled".to_string(), PropertyValue::Bool(enabled))]);
    let changed = settings.update("plugins", |s| {
        s.plugins.set_at(index, &patch);
    })?;
    let state = if enabled { "enabled" } else { "disabled" };
    if changed {
        writeln!(out, "{} Plugin {} {state}", "✓".green().bold(), name.yellow())?;
    } else {
        writeln!(out, "{} Plugin {} already {state}", "·".dimmed(), name)?;
    }
    Ok(())
}

fn position(settings: &SettingsFile, name: &str) -> anyhow::Result<usize> {
    settings
        .get()
        .plugins
        .items()
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| anyhow!("no plugin `{name}`"))
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(text: &str) -> PropertyValue {
    serde_json::from_str::<Value>(text).map_or_else(|_| PropertyValue::from(text), PropertyValue::from)
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn lookup_mut<'a>(root: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.').try_fold(root, |value, segment| match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use serde_json::json;

    use super::*;

    fn run(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
        colored::control::set_override(false);
        let file = dir.join("settings.json");
        let mut argv = vec![
            "objson".to_string(),
            "--file".to_string(),
            file.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run_command(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn saved(dir: &Path) -> Value {
        let text = fs::read_to_string(dir.join("settings.json")).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn show_does_not_create_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let text = run(dir.path(), &["show"]).unwrap();
        assert!(text.contains(r#""language": "en""#), "{text}");
        assert!(!text.contains("objectName"));
        assert!(!dir.path().join("settings.json").exists());

        let text = run(dir.path(), &["show", "--all"]).unwrap();
        assert!(text.contains(r#""objectName": "settings""#), "{text}");
    }

    #[test]
    fn flat_show() {
        let dir = tempfile::tempdir().unwrap();
        let text = run(dir.path(), &["show", "--flat"]).unwrap();
        assert!(
            text.contains(r#"window = {"height":768,"maximized":false,"width":1024}"#),
            "{text}"
        );
        assert!(text.contains("fontSize = 12"), "{text}");
    }

    #[test]
    fn set_persists_and_get_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["set", "fontSize", "14"]).unwrap();
        assert_eq!(saved(dir.path())["fontSize"], json!(14.0));

        run(dir.path(), &["set", "theme", "Dark"]).unwrap();
        run(dir.path(), &["set", "language", "fr"]).unwrap();
        let file = saved(dir.path());
        assert_eq!(file["theme"], json!(2));
        assert_eq!(file["language"], json!("fr"));
        assert_eq!(file["fontSize"], json!(14.0));

        let text = run(dir.path(), &["get", "language"]).unwrap();
        assert_eq!(text.trim(), r#""fr""#);
    }

    #[test]
    fn set_nested_field_keeps_siblings() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["set", "window.width", "800"]).unwrap();
        assert_eq!(
            saved(dir.path())["window"],
            json!({"width": 800, "height": 768, "maximized": false})
        );
        let text = run(dir.path(), &["get", "window.height"]).unwrap();
        assert_eq!(text.trim(), "768");
    }

    #[test]
    fn unchanged_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["set", "autosaveMinutes", "9"]).unwrap();
        let text = run(dir.path(), &["set", "autosaveMinutes", "9"]).unwrap();
        assert!(text.contains("autosaveMinutes unchanged"), "{text}");
    }

    #[test]
    fn bad_sets_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), &["set", "nope", "1"]).is_err());
        assert!(run(dir.path(), &["set", "schemaVersion", "2"]).is_err());
        assert!(run(dir.path(), &["set", "fontSize", "huge"]).is_err());
        assert!(run(dir.path(), &["get", "window.depth"]).is_err());
        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn plugin_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["plugin", "add", "spell"]).unwrap();
        run(dir.path(), &["plugin", "add", "lint", "--disabled"]).unwrap();
        assert!(run(dir.path(), &["plugin", "add", "spell"]).is_err());

        let text = run(dir.path(), &["plugin", "list"]).unwrap();
        assert!(text.contains("● spell"), "{text}");
        assert!(text.contains("○ lint"), "{text}");

        run(dir.path(), &["plugin", "enable", "lint"]).unwrap();
        run(dir.path(), &["plugin", "remove", "spell"]).unwrap();
        assert_eq!(
            saved(dir.path())["plugins"],
            json!([{"name": "lint", "enabled": true}])
        );
        assert!(run(dir.path(), &["plugin", "remove", "spell"]).is_err());
    }

    #[test]
    fn reset_recovers_a_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "garbage").unwrap();
        assert!(run(dir.path(), &["show"]).is_err());

        run(dir.path(), &["reset"]).unwrap();
        let defaults = ObjectMapper::to_converted_value(&Settings::default(), &IgnoredSet::default());
        assert_eq!(saved(dir.path()), defaults);
    }

    #[test]
    fn describe_line() {
        let dir = tempfile::tempdir().unwrap();
        let text = run(dir.path(), &["describe"]).unwrap();
        assert!(text.starts_with("Settings({language:en,theme:0,"), "{text}");
    }
}
