/// Mock tracking provider for unit tests (no device tracking required)

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use glam::{Vec2, Vec3};
#[cfg(test)]
use super::tracking::{
    DetectedSurface, RaycastMode, SurfaceAlignment, TrackingProvider, WorldHit,
};

/// Scripted tracker: fixed surfaces, fixed hits per ray-cast mode
#[cfg(test)]
pub struct MockTracking {
    pub surfaces: Vec<DetectedSurface>,
    pub exact_hit: Option<Vec3>,
    pub estimated_hit: Option<Vec3>,
    pub camera: Vec3,
    /// Modes of every ray-cast issued, in order
    pub raycasts: RefCell<Vec<RaycastMode>>,
}

#[cfg(test)]
impl MockTracking {
    /// 10 m x 10 m floor at y = 0, camera 1.5 m up at z = 3
    pub fn with_floor() -> Self {
        Self {
            surfaces: vec![DetectedSurface::horizontal(1, Vec3::ZERO, 10.0, 10.0)],
            exact_hit: None,
            estimated_hit: None,
            camera: Vec3::new(0.0, 1.5, 3.0),
            raycasts: RefCell::new(Vec::new()),
        }
    }

    pub fn hit_exact(mut self, point: Vec3) -> Self {
        self.exact_hit = Some(point);
        self
    }

    pub fn hit_estimated(mut self, point: Vec3) -> Self {
        self.estimated_hit = Some(point);
        self
    }
}

#[cfg(test)]
impl TrackingProvider for MockTracking {
    fn detected_surfaces(&self) -> Vec<DetectedSurface> {
        self.surfaces.clone()
    }

    fn raycast(
        &self,
        _screen_point: Vec2,
        mode: RaycastMode,
        _alignment: SurfaceAlignment,
    ) -> Option<WorldHit> {
        self.raycasts.borrow_mut().push(mode);
        match mode {
            RaycastMode::ExactSurface => self.exact_hit,
            RaycastMode::EstimatedSurface => self.estimated_hit,
        }
        .map(WorldHit::new)
    }

    fn camera_position(&self) -> Vec3 {
        self.camera
    }
}
