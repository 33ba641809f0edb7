//! Object mapping for objson.
//!
//! [`ObjectMapper`] converts a registered object to a JSON object, compact
//! JSON text or a flat map, and merges any of those back into an existing
//! instance. [`ValueCodec`] does the per-property work, picking a
//! conversion from the declared [`TypeTag`](objson_types::TypeTag).
//!
//! Merging is best-effort: each property converts on its own, failures are
//! collected as [`DecodeWarning`]s in the returned [`MergeReport`] (and
//! logged), and the remaining properties are still applied.

mod coerce;
pub mod codec;
pub mod describe;
pub mod error;
pub mod mapper;

#[cfg(test)]
mod fixtures;

pub use codec::{Decoded, ValueCodec};
pub use describe::Describe;
pub use error::{json_kind, DecodeWarning, MapperError, MapperResult};
pub use mapper::{MergeReport, ObjectMapper};
