/// Floor-snap queries over detected surfaces.

use glam::Vec3;
use super::tracking::DetectedSurface;

/// Surface to snap `point` to: among the surfaces whose footprint contains
/// the point horizontally, the closest in 3D distance.
pub fn snap_surface(point: Vec3, surfaces: &[DetectedSurface]) -> Option<&DetectedSurface> {
    surfaces
        .iter()
        .filter(|s| s.contains_horizontally(point))
        .min_by(|a, b| {
            a.center
                .distance_squared(point)
                .total_cmp(&b.center.distance_squared(point))
        })
}

/// Surface closest to `point` in 3D distance, footprint ignored
pub fn nearest_surface(point: Vec3, surfaces: &[DetectedSurface]) -> Option<&DetectedSurface> {
    surfaces.iter().min_by(|a, b| {
        a.center
            .distance_squared(point)
            .total_cmp(&b.center.distance_squared(point))
    })
}

/// Floor height under `point`, or None when no footprint contains it
pub fn floor_height(point: Vec3, surfaces: &[DetectedSurface]) -> Option<f32> {
    snap_surface(point, surfaces).map(DetectedSurface::height)
}

#[cfg(test)]
#[path = "floor_snap_tests.rs"]
mod tests;
