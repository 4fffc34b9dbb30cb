//! Furniture catalog module
//!
//! Immutable furniture specs and the JSON catalog loader that validates
//! and repairs them before they reach the engine.

mod furniture_spec;
mod catalog;

pub use furniture_spec::{
    Category, Size3, FurnitureMetadata, FurnitureSpec, FurnitureSpecDesc,
};
pub use catalog::{Catalog, CatalogLoadReport, CatalogWarning};
