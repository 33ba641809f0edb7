//! Property registration for objson.
//!
//! Objects become convertible by declaring their properties once, in a
//! static [`PropertyTable`]: a name, a declared type, and an accessor pair per
//! property. The table stands in for runtime reflection; the mapper walks it
//! through the object-safe [`Reflect`] trait.
//!
//! # Building blocks
//!
//! - [`Registered`]: implemented by a type to expose its table
//! - [`Reflect`]: object-safe view every registered type gets for free
//! - [`Property`]: builders for plain, read-only, write-only, nested-object
//!   and object-list properties
//! - [`PropertyType`]: maps a Rust type to a [`TypeTag`] and a
//!   [`PropertyValue`]; [`enum_property!`] and [`textual_property!`] cover
//!   integer-backed enums and `Display`/`FromStr` types
//! - [`PropertyDescriptor`]: per-call metadata handed to the codec

pub mod descriptor;
pub mod error;
pub mod property_type;
pub mod reflect;
pub mod table;

pub use descriptor::{ObjectFactory, PropertyDescriptor};
pub use error::{PropertyError, PropertyResult};
pub use property_type::PropertyType;
pub use reflect::{PropertyInput, PropertyRef, Reflect, Registered};
pub use table::{Property, PropertyTable};

// Re-exported for the declarative macros.
pub use objson_types::{EnumKeys, PrimitiveKind, PropertyValue, TypeError, TypeTag};
