use std::ops::Deref;
use std::sync::mpsc::Receiver;

use crate::notify::{ChangeNotifier, PropertyChanged};

/// A tracked property value.
///
/// [`set`](Self::set) stores the new value and notifies subscribers only
/// when it differs from the current one. Register it with a getter that
/// clones out of it and a setter that calls `set`, and merges notify too.
#[derive(Debug)]
pub struct Observable<V> {
    name: &'static str,
    value: V,
    notifier: ChangeNotifier,
}

impl<V> Observable<V> {
    pub fn new(name: &'static str, value: V) -> Self {
        Self {
            name,
            value,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> &V {
        &self.value
    }

    pub fn subscribe(&mut self) -> Receiver<PropertyChanged> {
        self.notifier.subscribe()
    }

    pub fn into_inner(self) -> V {
        self.value
    }
}

impl<V: PartialEq> Observable<V> {
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, value: V) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.notifier.notify(self.name);
        true
    }
}

impl<V> Deref for Observable<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}
