use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use objson_mapper::{MergeReport, ObjectMapper};
use objson_registry::Reflect;
use objson_types::IgnoredSet;

use crate::backend::{ByteStore, FsStore};
use crate::config::PersistConfig;
use crate::error::{StoreError, StoreResult};

/// Whether an object has completed its first load.
///
/// Moves `NotLoaded -> Loaded` once and never back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
}

impl LoadState {
    pub fn is_loaded(self) -> bool {
        self == Self::Loaded
    }

    pub(crate) fn mark_loaded(&mut self) {
        *self = Self::Loaded;
    }
}

/// An object that can be loaded from a file.
pub trait Persistable: Reflect {
    /// Runs once after each successful load, after the merge, to validate or
    /// repair the freshly loaded state.
    fn after_load(&mut self) {}
}

/// Saves objects to, and loads them from, files holding their compact JSON
/// encoding.
///
/// `save`/`load` report failures through the log and return `false`;
/// `try_save`/`try_load` return the error instead.
pub struct PersistenceFacade<S = FsStore> {
    store: S,
    config: PersistConfig,
}

impl PersistenceFacade<FsStore> {
    /// Facade over the local file system.
    pub fn fs(config: PersistConfig) -> Self {
        Self {
            store: FsStore::from_config(&config),
            config,
        }
    }
}

impl Default for PersistenceFacade<FsStore> {
    fn default() -> Self {
        Self::fs(PersistConfig::default())
    }
}

impl<S: ByteStore> PersistenceFacade<S> {
    pub fn new(store: S, config: PersistConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Write `object` to `path`, replacing the file, with the configured
    /// ignored set.
    pub fn try_save(&self, object: &dyn Reflect, path: &Path) -> StoreResult<()> {
        self.try_save_with(object, path, &self.config.ignored)
    }

    pub fn try_save_with(
        &self,
        object: &dyn Reflect,
        path: &Path,
        ignored: &IgnoredSet,
    ) -> StoreResult<()> {
        let text = ObjectMapper::to_json_text(object, ignored);
        let mut out = self
            .store
            .open_truncating_write(path)
            .map_err(|e| StoreError::io(path, e))?;
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| StoreError::io(path, e))?;
        debug!(
            object = object.type_name(),
            path = %path.display(),
            bytes = text.len(),
            "saved"
        );
        Ok(())
    }

    pub fn save(&self, object: &dyn Reflect, path: &Path) -> bool {
        self.save_with(object, path, &self.config.ignored)
    }

    /// Save with an explicit ignored set instead of the configured one.
    pub fn save_with(&self, object: &dyn Reflect, path: &Path, ignored: &IgnoredSet) -> bool {
        match self.try_save_with(object, path, ignored) {
            Ok(()) => true,
            Err(e) => {
                warn!(object = object.type_name(), error = %e, "save failed");
                false
            }
        }
    }

    /// Load `path` into `object`, tracking `state` and running the post-load
    /// hook.
    ///
    /// - open or read failure: `Err`, `object` and `state` untouched
    ///   (unless the file is missing and `missing_is_empty` is set, which
    ///   counts as loading an empty object)
    /// - malformed content: `Err`, `object` untouched, `state` set to
    ///   `Loaded`, hook not run
    /// - otherwise: merged, `state` set to `Loaded`, hook run; field-level
    ///   problems are in the returned report
    pub fn try_load<T: Persistable>(
        &self,
        object: &mut T,
        state: &mut LoadState,
        path: &Path,
    ) -> StoreResult<MergeReport> {
        let text = match self.read_text(path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() && self.config.missing_is_empty => {
                debug!(path = %path.display(), "no file yet, starting from defaults");
                state.mark_loaded();
                object.after_load();
                return Ok(MergeReport::default());
            }
            Err(e) => return Err(e),
        };

        let merged = ObjectMapper::merge_from_json_text(object, &text);
        state.mark_loaded();
        let report = merged.map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        object.after_load();
        debug!(
            object = object.type_name(),
            path = %path.display(),
            applied = report.applied.len(),
            warnings = report.warnings.len(),
            "loaded"
        );
        Ok(report)
    }

    pub fn load<T: Persistable>(&self, object: &mut T, state: &mut LoadState, path: &Path) -> bool {
        match self.try_load(object, state, path) {
            Ok(_) => true,
            Err(e) => {
                warn!(object = object.type_name(), error = %e, "load failed");
                false
            }
        }
    }

    /// Merge the file at `path` into any object, with no load-state
    /// tracking and no hook.
    pub fn try_load_into(&self, object: &mut dyn Reflect, path: &Path) -> StoreResult<MergeReport> {
        let text = self.read_text(path)?;
        ObjectMapper::merge_from_json_text(object, &text).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_into(&self, object: &mut dyn Reflect, path: &Path) -> bool {
        match self.try_load_into(object, path) {
            Ok(_) => true,
            Err(e) => {
                warn!(object = object.type_name(), error = %e, "load failed");
                false
            }
        }
    }

    fn read_text(&self, path: &Path) -> StoreResult<String> {
        let mut text = String::new();
        self.store
            .open_read(path)
            .and_then(|mut input| input.read_to_string(&mut text))
            .map_err(|e| StoreError::io(path, e))?;
        Ok(text)
    }
}
