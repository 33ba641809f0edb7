//! Foundation types for objson.
//!
//! objson converts objects with a declared set of named, typed properties
//! to and from JSON text and a loosely typed key/value map. This crate holds
//! the vocabulary every other objson crate shares.
//!
//! # Key Types
//!
//! - [`ConvertedValue`]: the JSON-compatible intermediate (a `serde_json::Value`
//!   with insertion-ordered objects)
//! - [`TypeTag`]: classification used to pick a conversion strategy
//! - [`PropertyValue`]: owned, loosely typed native value exchanged with
//!   property getters and setters
//! - [`FlatMap`]: key/value projection of an object graph
//! - [`IgnoredSet`]: property names excluded from a conversion call

pub mod error;
pub mod ignored;
pub mod tag;
pub mod value;

pub use error::TypeError;
pub use ignored::{IgnoredSet, OBJECT_NAME};
pub use tag::{EnumKeys, PrimitiveKind, TypeTag};
pub use value::{FlatMap, PropertyValue};

/// The JSON-compatible intermediate produced and consumed by the codec.
///
/// Objects preserve insertion order (`serde_json` is built with
/// `preserve_order`), so encoding an object yields keys in declaration order.
pub type ConvertedValue = serde_json::Value;

/// A JSON object: the top-level shape of every encoded object.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
