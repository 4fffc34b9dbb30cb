/// Spatial tracking collaborator.
///
/// Supplies detected surfaces, screen-point ray-casts and the camera pose.
/// Surfaces are read-only here.

use glam::{Vec2, Vec3, Mat4, Quat};

/// Which geometry a ray-cast may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaycastMode {
    /// Confirmed, detected surface geometry
    ExactSurface,
    /// Unconfirmed surface estimated by the tracker
    EstimatedSurface,
}

/// Required orientation of the hit surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceAlignment {
    Horizontal,
}

/// Detected plane, read-only
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedSurface {
    pub id: u64,
    /// World-space center of the plane
    pub center: Vec3,
    /// Footprint in the plane's own frame: x = width, y = depth
    pub extent: Vec2,
    /// World transform of the plane anchor
    pub transform: Mat4,
}

impl DetectedSurface {
    /// Horizontal surface anchored at its center
    pub fn horizontal(id: u64, center: Vec3, width: f32, depth: f32) -> Self {
        Self {
            id,
            center,
            extent: Vec2::new(width, depth),
            transform: Mat4::from_translation(center),
        }
    }

    /// Horizontal surface turned by `yaw` radians about its center
    pub fn horizontal_rotated(id: u64, center: Vec3, width: f32, depth: f32, yaw: f32) -> Self {
        Self {
            id,
            center,
            extent: Vec2::new(width, depth),
            transform: Mat4::from_rotation_translation(Quat::from_rotation_y(yaw), center),
        }
    }

    /// Height of the plane
    pub fn height(&self) -> f32 {
        self.center.y
    }

    /// Whether `point` lies within the footprint horizontally.
    ///
    /// The point is taken into the plane's frame first, so planes turned
    /// about Y are tested against their real outline.
    pub fn contains_horizontally(&self, point: Vec3) -> bool {
        let half = self.extent * 0.5;
        let (_, rotation, _) = self.transform.to_scale_rotation_translation();
        let local = rotation.inverse() * (point - self.center);
        local.x.abs() <= half.x && local.z.abs() <= half.y
    }
}

#[cfg(test)]
#[path = "tracking_tests.rs"]
mod tests;

/// Result of a ray-cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHit {
    pub position: Vec3,
    /// Surface that was hit, when the tracker knows it
    pub surface_id: Option<u64>,
}

impl WorldHit {
    pub fn new(position: Vec3) -> Self {
        Self { position, surface_id: None }
    }
}

/// Tracking session seen from the placement engine. Owner thread only.
pub trait TrackingProvider {
    fn detected_surfaces(&self) -> Vec<DetectedSurface>;

    fn raycast(
        &self,
        screen_point: Vec2,
        mode: RaycastMode,
        alignment: SurfaceAlignment,
    ) -> Option<WorldHit>;

    fn camera_position(&self) -> Vec3;
}
