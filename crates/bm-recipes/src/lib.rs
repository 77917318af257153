//! Recipe templates for the baker's math engine: the built-in catalog,
//! starter and sourdough builders, and user recipe files in TOML.

pub mod builders;
pub mod catalog;
pub mod error;
pub mod template;

pub use builders::{SourdoughParams, sourdough, sourdough_starter};
pub use catalog::{Catalog, CatalogEntry, OTHER_SECTION, SOURDOUGH_SECTION};
pub use error::{CatalogError, Result};
pub use template::CUSTOM_SECTION;
