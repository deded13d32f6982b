//! Materials catalog: the static category → material list reference data.
//!
//! The catalog document is a JSON object whose keys are category names and
//! whose values are ordered arrays of material names. Order is significant:
//! the transcription form and CSV export both rely on the flattened order.

mod loader;
mod model;

pub use loader::CatalogStatus;
pub use model::{Catalog, CatalogEntry, Category};
