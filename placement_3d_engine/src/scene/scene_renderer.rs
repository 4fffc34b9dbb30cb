/// Rendering collaborator.
///
/// The engine never draws anything; it queries measured bounds from the
/// renderer and tells it which quality to use for each instance.

use super::aabb::AABB;
use super::placed_instance::{InstanceKey, DetailLevel};

/// Scene graph / renderer seen from the placement engine.
///
/// Called on the owner thread only.
pub trait SceneRenderer {
    /// Measured world-space bounds of an instance's mesh, if known
    fn world_bounds(&self, key: InstanceKey) -> Option<AABB>;

    fn set_detail_level(&mut self, key: InstanceKey, level: DetailLevel);

    fn set_shadow_visible(&mut self, key: InstanceKey, visible: bool);

    /// Selection halo visibility
    fn set_highlight_visible(&mut self, _key: InstanceKey, _visible: bool) {}
}

/// No-op renderer - reports no bounds and ignores quality changes.
///
/// Placeholder for headless use; bounds then come from the instance's
/// own estimate.
pub struct NoOpSceneRenderer;

impl NoOpSceneRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer for NoOpSceneRenderer {
    fn world_bounds(&self, _key: InstanceKey) -> Option<AABB> {
        None
    }

    fn set_detail_level(&mut self, _key: InstanceKey, _level: DetailLevel) {}

    fn set_shadow_visible(&mut self, _key: InstanceKey, _visible: bool) {}
}
