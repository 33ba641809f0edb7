use std::fmt;

use objson_registry::{PropertyRef, Reflect};
use objson_types::IgnoredSet;

/// Human-readable one-line rendering of an object:
/// `TypeName({name:value,other:value})`, nested objects rendered the same
/// way. Meant for logs, not for parsing.
pub struct Describe<'a> {
    object: &'a dyn Reflect,
    ignored: IgnoredSet,
}

impl<'a> Describe<'a> {
    pub fn new(object: &'a dyn Reflect) -> Self {
        Self::ignoring(object, IgnoredSet::default())
    }

    pub fn ignoring(object: &'a dyn Reflect, ignored: IgnoredSet) -> Self {
        Self { object, ignored }
    }
}

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({{", self.object.type_name())?;
        let mut first = true;
        for descriptor in self.object.descriptors() {
            if !descriptor.readable || self.ignored.contains(descriptor.name) {
                continue;
            }
            let Some(property) = self.object.get_property(descriptor.name) else {
                continue;
            };
            if !first {
                f.write_str(",")?;
            }
            first = false;
            write!(f, "{}:", descriptor.name)?;
            match property {
                PropertyRef::Value(value) => write!(f, "{value}")?,
                PropertyRef::Object(Some(nested)) => write!(f, "{}", Describe::new(nested))?,
                PropertyRef::Object(None) => f.write_str("null")?,
                PropertyRef::ObjectList(items) => {
                    f.write_str("[")?;
                    for (i, item) in items.into_iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{}", Describe::new(item))?;
                    }
                    f.write_str("]")?;
                }
            }
        }
        f.write_str("})")
    }
}
