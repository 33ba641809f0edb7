use objson_types::TypeTag;

use crate::reflect::Reflect;

/// Constructs a fresh, default-initialised nested object.
pub type ObjectFactory = fn() -> Box<dyn Reflect>;

/// Runtime metadata describing one named, typed property.
#[derive(Clone, Copy, Debug)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub type_tag: TypeTag,
    pub readable: bool,
    pub writable: bool,
    /// Present for [`TypeTag::NestedObject`] and
    /// [`TypeTag::NestedObjectList`] properties.
    pub factory: Option<ObjectFactory>,
}

impl PropertyDescriptor {
    /// A new default instance of the nested object type, if this property
    /// holds objects.
    pub fn new_instance(&self) -> Option<Box<dyn Reflect>> {
        self.factory.map(|make| make())
    }
}
