//! Error types for the Placement3D engine
//!
//! Every failure in this crate is a failed user-visible operation, never a
//! process fault. Per-operation errors are returned synchronously to the
//! caller; catalog problems are repaired or reported as warnings at load time.

use std::fmt;
use crate::scene::InstanceKey;

/// Result type for Placement3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Placement3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Registry is full; the user must free space first (no retry)
    CapacityExceeded {
        /// Configured maximum number of placed instances
        capacity: usize,
    },

    /// Ray-cast found no surface, even against estimated geometry
    NoSurfaceFound,

    /// Malformed catalog entry that could not be repaired
    InvalidSpec(String),

    /// A move would make two instances overlap; the move was reverted
    InterferenceRejected {
        /// Instance being moved
        moving: InstanceKey,
        /// First instance it would have overlapped
        blocking: InstanceKey,
    },

    /// Asynchronous model load failed for one instance
    LoadFailed {
        spec_id: String,
        reason: String,
    },

    /// Remote generation exceeded its retry budget (terminal)
    PollTimeout {
        task_id: String,
        attempts: u32,
    },

    /// Remote generation reported a failure (terminal)
    GenerationFailed {
        task_id: String,
        reason: String,
    },

    /// Instance key does not refer to a placed instance
    UnknownInstance(InstanceKey),

    /// Catalog has no entry with this id
    UnknownSpec(String),

    /// Operation requires a selected instance
    NoSelection,

    /// Spiral search found no collision-free spot within the radius
    AutoPositionFailed {
        /// Search radius in meters
        radius: f32,
    },

    /// Catalog document could not be parsed at all
    CatalogParse(String),

    /// Engine configuration document could not be parsed
    ConfigParse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded { capacity } => {
                write!(f, "Capacity exceeded: at most {} objects can be placed", capacity)
            }
            Error::NoSurfaceFound => write!(f, "No surface found at pointer location"),
            Error::InvalidSpec(msg) => write!(f, "Invalid furniture spec: {}", msg),
            Error::InterferenceRejected { moving, blocking } => {
                write!(f, "Interference rejected: {:?} would overlap {:?}", moving, blocking)
            }
            Error::LoadFailed { spec_id, reason } => {
                write!(f, "Model load failed for '{}': {}", spec_id, reason)
            }
            Error::PollTimeout { task_id, attempts } => {
                write!(f, "Generation task '{}' timed out after {} polls", task_id, attempts)
            }
            Error::GenerationFailed { task_id, reason } => {
                write!(f, "Generation task '{}' failed: {}", task_id, reason)
            }
            Error::UnknownInstance(key) => write!(f, "Unknown instance: {:?}", key),
            Error::UnknownSpec(id) => write!(f, "Unknown furniture spec: '{}'", id),
            Error::NoSelection => write!(f, "No instance selected"),
            Error::AutoPositionFailed { radius } => {
                write!(f, "Auto-position failed: no free space within {:.2} m", radius)
            }
            Error::CatalogParse(msg) => write!(f, "Catalog parse error: {}", msg),
            Error::ConfigParse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Whether the error only warrants a transient warning in the UI
    /// (the operation was reverted and the scene is unchanged).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::InterferenceRejected { .. } | Error::AutoPositionFailed { .. }
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
