/*!
# Placement 3D Engine

Spatial placement and manipulation core for virtual furniture in a tracked
three-dimensional space.

The engine owns the placed instances and every decision made about them
(where they land, how gestures transform them, when they interfere, how big
they are rendered, when they are evicted or degraded). Everything else is an
external collaborator reached through a trait: surface tracking, the scene
renderer, the asset repository and the remote generation service.

## Architecture

- **ScaleCalculator**: real-world size to render scale, with accuracy report
- **PlacementRegistry**: capacity-bounded, insertion-ordered instance arena
- **InterferenceChecker**: AABB overlap tests between placed instances
- **PlacementResolver**: screen point to floor-snapped world placement
- **ManipulationController**: selection/transform state machine
- **PerformanceGovernor**: eviction and quality degradation under load
- **PlacementEngine**: facade composing all of the above for the presentation layer

All components are constructed explicitly and owned by the caller; the only
process-wide state is the log sink.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod catalog;
pub mod scale;
pub mod scene;
pub mod placement;
pub mod manipulation;
pub mod performance;
pub mod assets;
pub mod generation;

// Main placement3d namespace module
pub mod placement3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Facade
    pub use crate::engine::{PlacementEngine, InstanceDetails, CategoryCount};

    // Configuration
    pub use crate::config::EngineConfig;

    // Configuration sub-module
    pub mod config {
        pub use crate::config::*;
    }

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger, set_min_severity, min_severity};
    }

    // Catalog sub-module
    pub mod catalog {
        pub use crate::catalog::*;
    }

    // Scale sub-module
    pub mod scale {
        pub use crate::scale::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Placement sub-module
    pub mod placement {
        pub use crate::placement::*;
    }

    // Manipulation sub-module
    pub mod manipulation {
        pub use crate::manipulation::*;
    }

    // Performance sub-module
    pub mod performance {
        pub use crate::performance::*;
    }

    // Assets sub-module
    pub mod assets {
        pub use crate::assets::*;
    }

    // Generation sub-module
    pub mod generation {
        pub use crate::generation::*;
    }
}

// Re-export math library at crate root
pub use glam;
