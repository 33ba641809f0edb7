use std::ops::Deref;
use std::path::Path;

use serde_json::Value;

use objson_mapper::{Describe, MapperResult, MergeReport, ObjectMapper};
use objson_types::{FlatMap, IgnoredSet, JsonObject};

use crate::backend::{ByteStore, FsStore};
use crate::config::PersistConfig;
use crate::error::StoreResult;
use crate::facade::{LoadState, Persistable, PersistenceFacade};

/// An object bundled with its load state and the facade that persists it.
///
/// Reading goes through `Deref`; writes go through [`get_mut`](Self::get_mut)
/// or the merge helpers.
pub struct Document<T, S = FsStore> {
    object: T,
    state: LoadState,
    facade: PersistenceFacade<S>,
}

impl<T: Persistable + Default> Document<T, FsStore> {
    /// A default object persisted to the local file system.
    pub fn new(config: PersistConfig) -> Self {
        Self::with_facade(T::default(), PersistenceFacade::fs(config))
    }
}

impl<T: Persistable, S: ByteStore> Document<T, S> {
    pub fn with_facade(object: T, facade: PersistenceFacade<S>) -> Self {
        Self {
            object,
            state: LoadState::NotLoaded,
            facade,
        }
    }

    pub fn get(&self) -> &T {
        &self.object
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.object
    }

    pub fn into_inner(self) -> T {
        self.object
    }

    pub fn facade(&self) -> &PersistenceFacade<S> {
        &self.facade
    }

    pub fn load_state(&self) -> LoadState {
        self.state
    }

    /// Whether the first load has completed.
    pub fn is_load_finished(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn save(&self, path: &Path) -> bool {
        self.facade.save(&self.object, path)
    }

    pub fn try_save(&self, path: &Path) -> StoreResult<()> {
        self.facade.try_save(&self.object, path)
    }

    pub fn load(&mut self, path: &Path) -> bool {
        self.facade.load(&mut self.object, &mut self.state, path)
    }

    pub fn try_load(&mut self, path: &Path) -> StoreResult<MergeReport> {
        self.facade.try_load(&mut self.object, &mut self.state, path)
    }

    fn ignored(&self) -> &IgnoredSet {
        &self.facade.config().ignored
    }

    /// Compact JSON text, exactly what [`save`](Self::save) writes.
    pub fn json(&self) -> String {
        ObjectMapper::to_json_text(&self.object, self.ignored())
    }

    pub fn json_object(&self) -> JsonObject {
        ObjectMapper::to_json_object(&self.object, self.ignored())
    }

    pub fn flat_map(&self) -> FlatMap {
        ObjectMapper::to_flat_map(&self.object, self.ignored())
    }

    pub fn merge_from_flat_map(&mut self, source: &FlatMap) -> MergeReport {
        ObjectMapper::merge_from_flat_map(&mut self.object, source)
    }

    pub fn merge_from_json_value(&mut self, value: &Value) -> MergeReport {
        ObjectMapper::merge_from_json_value(&mut self.object, value)
    }

    pub fn merge_from_json_text(&mut self, text: &str) -> MapperResult<MergeReport> {
        ObjectMapper::merge_from_json_text(&mut self.object, text)
    }

    pub fn describe(&self) -> Describe<'_> {
        Describe::ignoring(&self.object, self.ignored().clone())
    }
}

impl<T, S> Deref for Document<T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}
