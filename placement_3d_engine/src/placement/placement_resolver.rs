/// PlacementResolver - screen point to validated world placement.
///
/// Algorithm:
/// 1. Reject when the registry is full (placement never evicts)
/// 2. Ray-cast against detected horizontal geometry
/// 3. Fall back to an estimated horizontal surface
/// 4. Floor-snap the hit to the closest surface whose footprint contains it
/// 5. Center the object vertically on that floor

use std::sync::Arc;
use glam::{Vec2, Vec3, Quat};
use crate::catalog::FurnitureSpec;
use crate::config::PlacementConfig;
use crate::error::{Error, Result};
use crate::scale::{ScaleCalculator, ScaleResult};
use crate::scene::{AABB, InstanceKey, PlacedInstance, PlacementRegistry, WorldTransform};
use super::floor_snap::floor_height;
use super::tracking::{RaycastMode, SurfaceAlignment, TrackingProvider};

const LOG_SOURCE: &str = "placement3d::Resolver";

/// Result of a successful placement
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    pub key: InstanceKey,
    pub transform: WorldTransform,
    pub scale: ScaleResult,
}

pub struct PlacementResolver {
    config: PlacementConfig,
    scale_calculator: ScaleCalculator,
}

impl PlacementResolver {
    pub fn new(config: PlacementConfig, scale_calculator: ScaleCalculator) -> Self {
        Self { config, scale_calculator }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn scale_calculator(&self) -> &ScaleCalculator {
        &self.scale_calculator
    }

    /// Resolve where `spec` would land for a pointer at `screen_point`.
    ///
    /// The returned transform carries the spec's default scale.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if the registry is full
    /// - `NoSurfaceFound` if neither detected nor estimated geometry is hit
    pub fn resolve_placement(
        &self,
        screen_point: Vec2,
        spec: &FurnitureSpec,
        registry: &PlacementRegistry,
        tracking: &dyn TrackingProvider,
    ) -> Result<WorldTransform> {
        if registry.is_full() {
            crate::engine_warn!(LOG_SOURCE,
                "Cannot place '{}': capacity of {} reached", spec.id(), registry.max_capacity());
            return Err(Error::CapacityExceeded { capacity: registry.max_capacity() });
        }

        let hit = tracking
            .raycast(screen_point, RaycastMode::ExactSurface, SurfaceAlignment::Horizontal)
            .or_else(|| {
                crate::engine_debug!(LOG_SOURCE,
                    "No detected surface at {:?}, trying estimated surface", screen_point);
                tracking.raycast(screen_point, RaycastMode::EstimatedSurface, SurfaceAlignment::Horizontal)
            })
            .ok_or_else(|| {
                crate::engine_warn!(LOG_SOURCE, "No surface found at {:?}", screen_point);
                Error::NoSurfaceFound
            })?;

        let surfaces = tracking.detected_surfaces();
        let floor = floor_height(hit.position, &surfaces).unwrap_or(hit.position.y);
        let position = Vec3::new(
            hit.position.x,
            floor + spec.real_size().height * 0.5,
            hit.position.z,
        );

        let orientation = if self.config.face_camera {
            facing_yaw(position, tracking.camera_position())
        } else {
            Quat::IDENTITY
        };

        Ok(WorldTransform::new(position, orientation, spec.default_scale()))
    }

    /// Resolve, compute the initial scale and insert a new instance.
    ///
    /// `model_bounds` is the model's bounding box in model units when it is
    /// already known; it becomes the instance's local bounds. Otherwise the
    /// spec's default scale and real size are used. The instance rests on
    /// the snapped floor either way.
    pub fn place(
        &self,
        screen_point: Vec2,
        spec: &Arc<FurnitureSpec>,
        model_bounds: Option<&AABB>,
        registry: &mut PlacementRegistry,
        tracking: &dyn TrackingProvider,
    ) -> Result<PlacementOutcome> {
        let mut transform = self.resolve_placement(screen_point, spec, registry, tracking)?;
        let floor = transform.position.y - spec.real_size().height * 0.5;

        let scale = self.scale_calculator.compute_for_spec(model_bounds, spec);
        transform.scale = scale.scale;

        let mut instance = PlacedInstance::new(Arc::clone(spec), transform);
        if let Some(bounds) = model_bounds {
            instance = instance.with_model_bounds(bounds);
        }
        // Rendered height can differ from the catalog height under a non-exact fit
        instance.rest_on(floor);
        let transform = *instance.transform();

        let key = registry.add(instance)?;
        crate::engine_info!(LOG_SOURCE,
            "Placed '{}' as {:?} at ({:.2}, {:.2}, {:.2}), scale {:.3}",
            spec.id(), key, transform.position.x, transform.position.y, transform.position.z,
            transform.scale);

        Ok(PlacementOutcome { key, transform, scale })
    }
}

/// Yaw turning the object's front (+Z) toward the camera, horizontally
fn facing_yaw(position: Vec3, camera: Vec3) -> Quat {
    let direction = camera - position;
    if direction.x.abs() < 1e-6 && direction.z.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}

#[cfg(test)]
#[path = "placement_resolver_tests.rs"]
mod tests;
