//! Placement module
//!
//! Tracking collaborator interface, floor-snap and the placement resolver.

mod tracking;
mod floor_snap;
mod placement_resolver;
pub(crate) mod mock_tracking;

pub use tracking::{
    TrackingProvider, DetectedSurface, WorldHit, RaycastMode, SurfaceAlignment,
};
pub use floor_snap::{snap_surface, nearest_surface, floor_height};
pub use placement_resolver::{PlacementResolver, PlacementOutcome};
