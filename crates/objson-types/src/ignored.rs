use serde::{Deserialize, Serialize};

/// Identity label carried by every object. It is internal bookkeeping and is
/// excluded from conversion unless a caller overrides the ignored set.
pub const OBJECT_NAME: &str = "objectName";

/// Ordered set of property names excluded from a conversion call.
///
/// The default set contains exactly [`OBJECT_NAME`]; use
/// [`IgnoredSet::empty`] to convert every property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoredSet {
    names: Vec<String>,
}

impl IgnoredSet {
    /// A set that ignores nothing.
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    /// A set holding exactly the given names (duplicates collapse).
    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().collect()
    }

    /// Add a name, keeping first-insertion order. Returns `false` if it was
    /// already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.insert(name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for IgnoredSet {
    fn default() -> Self {
        Self {
            names: vec![OBJECT_NAME.to_string()],
        }
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoredSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::empty();
        for name in iter {
            set.insert(name);
        }
        set
    }
}
