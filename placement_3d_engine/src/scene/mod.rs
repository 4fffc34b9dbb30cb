//! Scene module
//!
//! Placed instances, their registry, bounding boxes, interference tests
//! and the renderer collaborator interface.

mod aabb;
mod placed_instance;
mod placement_registry;
mod interference_checker;
mod scene_renderer;
pub(crate) mod mock_scene_renderer;

pub use aabb::AABB;
pub use placed_instance::{
    InstanceKey, PlacedInstance, WorldTransform, DetailLevel, QualityFlags, yaw_only,
};
pub use placement_registry::{PlacementRegistry, DEFAULT_MAX_CAPACITY};
pub use interference_checker::InterferenceChecker;
pub use scene_renderer::{SceneRenderer, NoOpSceneRenderer};
