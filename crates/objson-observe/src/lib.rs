//! Change tracking for objson objects.
//!
//! - [`ChangeNotifier`] fans [`PropertyChanged`] events out over channels
//! - [`Observable`] wraps one field and notifies only on real changes
//! - [`AutoPersist`] saves a loaded document whenever a property changes
//! - [`ObjectList`] keeps a list of nested objects and its JSON form in step

pub mod autopersist;
pub mod error;
pub mod notify;
pub mod object_list;
pub mod observable;

#[cfg(test)]
mod fixtures;

pub use autopersist::AutoPersist;
pub use error::{ObserveError, ObserveResult};
pub use notify::{ChangeNotifier, PropertyChanged};
pub use object_list::ObjectList;
pub use observable::Observable;
