use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use serde_json::Value;
use tracing::debug;

use objson_mapper::{MergeReport, ObjectMapper, ValueCodec};
use objson_registry::{PropertyDescriptor, Reflect};
use objson_store::{ByteStore, Document, FsStore, Persistable, StoreResult};
use objson_types::{IgnoredSet, JsonObject, PropertyValue};

use crate::error::{ObserveError, ObserveResult};
use crate::notify::{ChangeNotifier, PropertyChanged};

/// Saves a document to its file whenever a property really changes.
///
/// Every setter here applies the mutation, notifies subscribers, then saves
/// the whole object to the remembered path, but only once the document has
/// finished its first load, so defaults never overwrite a file that has not
/// been read yet. A failed save is logged by the facade and otherwise
/// ignored: the mutation stands.
pub struct AutoPersist<T, S = FsStore> {
    document: Document<T, S>,
    path: PathBuf,
    notifier: ChangeNotifier,
}

impl<T: Persistable, S: ByteStore> AutoPersist<T, S> {
    pub fn new(document: Document<T, S>, path: impl Into<PathBuf>) -> Self {
        Self {
            document,
            path: path.into(),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document<T, S> {
        &self.document
    }

    pub fn get(&self) -> &T {
        self.document.get()
    }

    pub fn into_document(self) -> Document<T, S> {
        self.document
    }

    pub fn is_load_finished(&self) -> bool {
        self.document.is_load_finished()
    }

    /// Load the remembered file.
    pub fn load(&mut self) -> bool {
        self.document.load(&self.path)
    }

    pub fn try_load(&mut self) -> StoreResult<MergeReport> {
        self.document.try_load(&self.path)
    }

    /// Save now, regardless of load state.
    pub fn save(&self) -> bool {
        self.document.save(&self.path)
    }

    pub fn subscribe(&mut self) -> Receiver<PropertyChanged> {
        self.notifier.subscribe()
    }

    pub fn subscribe_to(&mut self, property: impl Into<String>) -> Receiver<PropertyChanged> {
        self.notifier.subscribe_to(property)
    }

    /// Store `value` in the field `slot` selects. Returns `true` if it
    /// differed from the old value.
    ///
    /// ```ignore
    /// settings.set("volume", |s| &mut s.volume, 80);
    /// ```
    pub fn set<V: PartialEq>(
        &mut self,
        property: &str,
        slot: impl FnOnce(&mut T) -> &mut V,
        value: V,
    ) -> bool {
        let field = slot(self.document.get_mut());
        if *field == value {
            return false;
        }
        *field = value;
        self.changed(property);
        true
    }

    /// Mutate the object freely; `property` is compared in its encoded form
    /// before and after to decide whether anything changed. A write-only
    /// property cannot be compared and always counts as changed.
    ///
    /// An unregistered `property` is an error and `f` is not run.
    pub fn update(&mut self, property: &str, f: impl FnOnce(&mut T)) -> ObserveResult<bool> {
        let descriptor = self.descriptor(property)?;
        let before = self.snapshot(property);
        f(self.document.get_mut());
        if descriptor.readable && self.snapshot(property) == before {
            return Ok(false);
        }
        self.changed(property);
        Ok(true)
    }

    /// Set a property by name, converting `value` the same way a merge
    /// would.
    pub fn set_property(
        &mut self,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> ObserveResult<bool> {
        let descriptor = self.descriptor(property)?;
        if !descriptor.writable {
            return Err(ObserveError::NotWritable(property.to_string()));
        }

        let before = self.snapshot(property);
        let mut source = JsonObject::new();
        source.insert(property.to_string(), value.into().to_json());
        let report =
            ObjectMapper::merge_from_ignoring(self.document.get_mut(), &source, &IgnoredSet::empty());
        if report.applied.is_empty() {
            return Err(match report.warnings.into_iter().next() {
                Some(warning) => ObserveError::Decode(warning),
                None => ObserveError::NotWritable(property.to_string()),
            });
        }

        if descriptor.readable && self.snapshot(property) == before {
            return Ok(false);
        }
        self.changed(property);
        Ok(true)
    }

    fn descriptor(&self, property: &str) -> ObserveResult<PropertyDescriptor> {
        let object: &dyn Reflect = self.document.get();
        object
            .descriptor(property)
            .ok_or_else(|| ObserveError::Unknown(property.to_string()))
    }

    fn snapshot(&self, property: &str) -> Option<Value> {
        let object: &dyn Reflect = self.document.get();
        let descriptor = object.descriptor(property)?;
        object
            .get_property(property)
            .map(|value| ValueCodec::encode(value, &descriptor.type_tag))
    }

    fn changed(&mut self, property: &str) {
        self.notifier.notify(property);
        if self.document.is_load_finished() {
            self.document.save(&self.path);
        } else {
            debug!(property, path = %self.path.display(), "not loaded yet, save skipped");
        }
    }
}
