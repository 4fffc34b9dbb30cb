/// Asset repository collaborator.
///
/// Loads and caches 3D models. `load_model` is called from loader worker
/// threads, so implementations must be thread-safe.

use std::fmt;
use crate::scene::AABB;

/// Opaque handle to a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableHandle {
    id: u64,
    model_bounds: Option<AABB>,
}

impl RenderableHandle {
    /// Create a handle. `model_bounds` is the model's bounding box in model
    /// units, when the repository could measure it.
    pub fn new(id: u64, model_bounds: Option<AABB>) -> Self {
        Self { id, model_bounds }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn model_bounds(&self) -> Option<AABB> {
        self.model_bounds
    }
}

/// Why a model could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No model exists for this spec id
    NotFound(String),
    /// The model exists but could not be decoded
    Decode(String),
    /// Storage or network failure
    Unavailable(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(id) => write!(f, "no model for '{}'", id),
            LoadError::Decode(msg) => write!(f, "decode error: {}", msg),
            LoadError::Unavailable(msg) => write!(f, "repository unavailable: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// Model store seen from the placement engine
pub trait AssetRepository: Send + Sync {
    /// Load (or fetch from cache) the model of a furniture spec.
    ///
    /// May block; only ever called off the owner thread.
    fn load_model(&self, spec_id: &str) -> Result<RenderableHandle, LoadError>;

    /// Drop the least recently used cached model to free memory
    fn evict_least_recently_used(&self);
}
