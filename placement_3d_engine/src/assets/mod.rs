//! Assets module
//!
//! Asset repository collaborator and the off-thread model loader.

mod asset_repository;
mod asset_loader;

pub use asset_repository::{AssetRepository, RenderableHandle, LoadError};
pub use asset_loader::{AssetLoader, AssetLoadEvent};
