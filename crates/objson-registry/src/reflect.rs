use std::any::Any;
use std::fmt;

use objson_types::PropertyValue;

use crate::descriptor::PropertyDescriptor;
use crate::error::PropertyResult;
use crate::table::PropertyTable;

/// Object-safe view of an object with registered properties.
///
/// Every [`Registered`] type implements this through a blanket impl; the
/// mapper only ever talks to `dyn Reflect`.
pub trait Reflect: Any {
    /// Name of the concrete type as registered.
    fn type_name(&self) -> &'static str;

    /// Property descriptors in declaration order, built fresh on each call.
    fn descriptors(&self) -> Vec<PropertyDescriptor>;

    /// Descriptor of a single property.
    fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.descriptors().into_iter().find(|d| d.name == name)
    }

    /// Read a property. Returns `None` for unknown or write-only properties.
    fn get_property(&self, name: &str) -> Option<PropertyRef<'_>>;

    /// Write a property through its setter.
    fn set_property(&mut self, name: &str, input: PropertyInput) -> PropertyResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Reflect {
    /// Downcast to a concrete registered type.
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Read a plain (non-object) property value.
    pub fn get_value(&self, name: &str) -> Option<PropertyValue> {
        self.get_property(name).and_then(PropertyRef::into_value)
    }

    /// Write a plain (non-object) property value.
    pub fn set_value(&mut self, name: &str, value: PropertyValue) -> PropertyResult<()> {
        self.set_property(name, PropertyInput::Value(value))
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A type that carries a static property registration table.
///
/// The table is built once, typically inside a `OnceLock`:
///
/// ```
/// use std::sync::OnceLock;
/// use objson_registry::{Property, PropertyTable, Reflect, Registered};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Registered for Point {
///     fn registry() -> &'static PropertyTable<Self> {
///         static TABLE: OnceLock<PropertyTable<Point>> = OnceLock::new();
///         TABLE.get_or_init(|| {
///             PropertyTable::new("Point")
///                 .with(Property::value("x", |p: &Point| p.x, |p, v| p.x = v))
///                 .with(Property::value("y", |p: &Point| p.y, |p, v| p.y = v))
///         })
///     }
/// }
///
/// let point = Point { x: 3, y: 4 };
/// let names: Vec<_> = point.descriptors().iter().map(|d| d.name).collect();
/// assert_eq!(names, ["x", "y"]);
/// ```
pub trait Registered: Any + Sized {
    fn registry() -> &'static PropertyTable<Self>;
}

impl<T: Registered> Reflect for T {
    fn type_name(&self) -> &'static str {
        T::registry().type_name()
    }

    fn descriptors(&self) -> Vec<PropertyDescriptor> {
        T::registry().descriptors()
    }

    fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        T::registry().descriptor(name)
    }

    fn get_property(&self, name: &str) -> Option<PropertyRef<'_>> {
        T::registry().get(self, name)
    }

    fn set_property(&mut self, name: &str, input: PropertyInput) -> PropertyResult<()> {
        T::registry().set(self, name, input)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// What a property getter yields.
pub enum PropertyRef<'a> {
    Value(PropertyValue),
    /// A nested object, or `None` when the reference is unset.
    Object(Option<&'a dyn Reflect>),
    ObjectList(Vec<&'a dyn Reflect>),
}

impl PropertyRef<'_> {
    /// The plain value, if this is not an object reference.
    pub fn into_value(self) -> Option<PropertyValue> {
        match self {
            Self::Value(v) => Some(v),
            Self::Object(_) | Self::ObjectList(_) => None,
        }
    }
}

impl fmt::Debug for PropertyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Object(obj) => f.debug_tuple("Object").field(obj).finish(),
            Self::ObjectList(items) => f.debug_tuple("ObjectList").field(items).finish(),
        }
    }
}

/// What a property setter accepts.
///
/// Object inputs are owned: the parent takes the new instance and drops the
/// one it replaces.
pub enum PropertyInput {
    Value(PropertyValue),
    Object(Box<dyn Reflect>),
    ObjectList(Vec<Box<dyn Reflect>>),
}

impl PropertyInput {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Value(v) => v.kind_name(),
            Self::Object(_) => "object",
            Self::ObjectList(_) => "object list",
        }
    }
}

impl From<PropertyValue> for PropertyInput {
    fn from(value: PropertyValue) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for PropertyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Object(obj) => f.debug_tuple("Object").field(obj).finish(),
            Self::ObjectList(items) => f.debug_tuple("ObjectList").field(items).finish(),
        }
    }
}
