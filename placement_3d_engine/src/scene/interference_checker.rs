/// Interference checks between placed instances.
///
/// World bounds come from the renderer when it has measured them, and
/// from the instance's own estimate otherwise.

use glam::Vec3;
use super::aabb::AABB;
use super::placed_instance::{InstanceKey, PlacedInstance};
use super::placement_registry::PlacementRegistry;
use super::scene_renderer::SceneRenderer;

/// Stateless AABB interference tests
pub struct InterferenceChecker;

impl InterferenceChecker {
    /// True iff the two boxes overlap on all three axes (strictly).
    /// Symmetric.
    pub fn overlaps(a: &AABB, b: &AABB) -> bool {
        a.overlaps(b)
    }

    /// Current world bounds of an instance
    pub fn world_bounds(
        key: InstanceKey,
        instance: &PlacedInstance,
        renderer: &dyn SceneRenderer,
    ) -> AABB {
        renderer
            .world_bounds(key)
            .unwrap_or_else(|| instance.estimated_world_bounds())
    }

    /// Bounds of `key` if it were moved to `position`
    pub fn bounds_at(
        key: InstanceKey,
        instance: &PlacedInstance,
        position: Vec3,
        renderer: &dyn SceneRenderer,
    ) -> AABB {
        Self::world_bounds(key, instance, renderer).translated(position - instance.position())
    }

    /// First instance (in insertion order) other than `moving` whose bounds
    /// overlap `candidate`
    pub fn first_blocking(
        moving: InstanceKey,
        candidate: &AABB,
        registry: &PlacementRegistry,
        renderer: &dyn SceneRenderer,
    ) -> Option<InstanceKey> {
        registry
            .all()
            .filter(|(key, _)| *key != moving)
            .find(|(key, other)| {
                Self::overlaps(candidate, &Self::world_bounds(*key, other, renderer))
            })
            .map(|(key, _)| key)
    }

    /// Every overlapping pair, in insertion order (O(n²))
    pub fn all_interfering_pairs(
        registry: &PlacementRegistry,
        renderer: &dyn SceneRenderer,
    ) -> Vec<(InstanceKey, InstanceKey)> {
        let bounds: Vec<(InstanceKey, AABB)> = registry
            .all()
            .map(|(key, instance)| (key, Self::world_bounds(key, instance, renderer)))
            .collect();

        let mut pairs = Vec::new();
        for (i, (key_a, a)) in bounds.iter().enumerate() {
            for (key_b, b) in &bounds[i + 1..] {
                if Self::overlaps(a, b) {
                    pairs.push((*key_a, *key_b));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
#[path = "interference_checker_tests.rs"]
mod tests;
