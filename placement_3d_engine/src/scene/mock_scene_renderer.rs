/// Mock SceneRenderer for unit tests (no rendering backend required)

#[cfg(test)]
use rustc_hash::FxHashMap;
#[cfg(test)]
use super::aabb::AABB;
#[cfg(test)]
use super::placed_instance::{InstanceKey, DetailLevel};
#[cfg(test)]
use super::scene_renderer::SceneRenderer;

/// Renderer that reports scripted bounds and records quality requests
#[cfg(test)]
#[derive(Default)]
pub struct MockSceneRenderer {
    /// Measured bounds per instance (missing = not measured)
    pub bounds: FxHashMap<InstanceKey, AABB>,
    pub detail_levels: FxHashMap<InstanceKey, DetailLevel>,
    pub shadows: FxHashMap<InstanceKey, bool>,
    pub highlights: FxHashMap<InstanceKey, bool>,
}

#[cfg(test)]
impl MockSceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl SceneRenderer for MockSceneRenderer {
    fn world_bounds(&self, key: InstanceKey) -> Option<AABB> {
        self.bounds.get(&key).copied()
    }

    fn set_detail_level(&mut self, key: InstanceKey, level: DetailLevel) {
        self.detail_levels.insert(key, level);
    }

    fn set_shadow_visible(&mut self, key: InstanceKey, visible: bool) {
        self.shadows.insert(key, visible);
    }

    fn set_highlight_visible(&mut self, key: InstanceKey, visible: bool) {
        self.highlights.insert(key, visible);
    }
}
