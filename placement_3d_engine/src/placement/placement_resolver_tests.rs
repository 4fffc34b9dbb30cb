/// Tests for PlacementResolver
///
/// Ray-cast fallback, floor-snap, vertical centering, capacity rejection
/// and camera-facing yaw, against a scripted tracker.

use super::*;
use crate::catalog::{Category, FurnitureSpecDesc, Size3};
use crate::config::ScaleConfig;
use crate::placement::mock_tracking::MockTracking;
use crate::placement::DetectedSurface;
use crate::scale::AccuracyTier;

// ============================================================================
// Helper Functions
// ============================================================================

fn resolver() -> PlacementResolver {
    PlacementResolver::new(PlacementConfig::default(), ScaleCalculator::new(ScaleConfig::default()))
}

fn resolver_without_facing() -> PlacementResolver {
    PlacementResolver::new(PlacementConfig { face_camera: false }, ScaleCalculator::default())
}

fn sofa() -> Arc<FurnitureSpec> {
    let mut desc = FurnitureSpecDesc::with_defaults("sofa", Category::Sofa);
    desc.real_size = Size3::new(2.0, 0.8, 0.9);
    desc.min_scale = 0.001;
    desc.max_scale = 100.0;
    Arc::new(FurnitureSpec::from_desc(desc).unwrap())
}

const POINTER: Vec2 = Vec2::new(0.5, 0.5);

// ============================================================================
// Ray-cast and floor-snap
// ============================================================================

#[test]
fn test_exact_hit_is_snapped_and_centered() {
    let tracking = MockTracking::with_floor().hit_exact(Vec3::new(1.0, 0.03, -2.0));
    let registry = PlacementRegistry::new(10);

    let transform = resolver().resolve_placement(POINTER, &sofa(), &registry, &tracking).unwrap();

    assert_eq!(transform.position, Vec3::new(1.0, 0.4, -2.0));
    assert_eq!(transform.scale, 1.0);
    assert_eq!(*tracking.raycasts.borrow(), vec![RaycastMode::ExactSurface]);
}

#[test]
fn test_falls_back_to_estimated_surface() {
    let tracking = MockTracking::with_floor().hit_estimated(Vec3::new(0.0, -0.02, 1.0));
    let registry = PlacementRegistry::new(10);

    let transform = resolver().resolve_placement(POINTER, &sofa(), &registry, &tracking).unwrap();

    assert!((transform.position.y - 0.4).abs() < 1e-6);
    assert_eq!(
        *tracking.raycasts.borrow(),
        vec![RaycastMode::ExactSurface, RaycastMode::EstimatedSurface]
    );
}

#[test]
fn test_no_hit_is_no_surface_found() {
    let tracking = MockTracking::with_floor();
    let registry = PlacementRegistry::new(10);

    let result = resolver().resolve_placement(POINTER, &sofa(), &registry, &tracking);
    assert_eq!(result, Err(Error::NoSurfaceFound));
}

#[test]
fn test_raw_hit_height_without_containing_surface() {
    let mut tracking = MockTracking::with_floor().hit_exact(Vec3::new(20.0, 0.3, 0.0));
    tracking.surfaces.push(DetectedSurface::horizontal(2, Vec3::new(0.0, 1.0, 0.0), 1.0, 1.0));
    let registry = PlacementRegistry::new(10);

    let transform = resolver().resolve_placement(POINTER, &sofa(), &registry, &tracking).unwrap();
    assert!((transform.position.y - 0.7).abs() < 1e-6);
}

#[test]
fn test_snaps_to_closest_containing_surface() {
    let mut tracking = MockTracking::with_floor().hit_exact(Vec3::new(0.2, 0.72, 0.1));
    tracking.surfaces.push(DetectedSurface::horizontal(2, Vec3::new(0.0, 0.75, 0.0), 1.2, 0.8));
    let registry = PlacementRegistry::new(10);

    let transform = resolver().resolve_placement(POINTER, &sofa(), &registry, &tracking).unwrap();
    assert!((transform.position.y - (0.75 + 0.4)).abs() < 1e-6);
}

// ============================================================================
// Capacity
// ============================================================================

#[test]
fn test_full_registry_is_rejected_before_raycast() {
    let tracking = MockTracking::with_floor().hit_exact(Vec3::ZERO);
    let mut registry = PlacementRegistry::new(1);
    resolver().place(POINTER, &sofa(), None, &mut registry, &tracking).unwrap();
    tracking.raycasts.borrow_mut().clear();

    let result = resolver().place(POINTER, &sofa(), None, &mut registry, &tracking);

    assert!(matches!(result, Err(Error::CapacityExceeded { capacity: 1 })));
    assert_eq!(registry.len(), 1);
    assert!(tracking.raycasts.borrow().is_empty());
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn test_faces_camera() {
    // camera at (0, 1.5, 3); object at (3, _, 3) must look toward -X
    let tracking = MockTracking::with_floor().hit_exact(Vec3::new(3.0, 0.0, 3.0));
    let registry = PlacementRegistry::new(10);

    let transform = resolver().resolve_placement(POINTER, &sofa(), &registry, &tracking).unwrap();
    let front = transform.orientation * Vec3::Z;

    assert!((front - Vec3::NEG_X).length() < 1e-5);
    assert!(transform.orientation.x.abs() < 1e-6 && transform.orientation.z.abs() < 1e-6);
}

#[test]
fn test_facing_disabled_keeps_identity() {
    let tracking = MockTracking::with_floor().hit_exact(Vec3::new(3.0, 0.0, 3.0));
    let registry = PlacementRegistry::new(10);

    let transform = resolver_without_facing()
        .resolve_placement(POINTER, &sofa(), &registry, &tracking)
        .unwrap();
    assert_eq!(transform.orientation, Quat::IDENTITY);
}

// ============================================================================
// Place
// ============================================================================

#[test]
fn test_place_inserts_with_computed_scale() {
    let tracking = MockTracking::with_floor().hit_exact(Vec3::new(0.0, 0.0, -1.0));
    let mut registry = PlacementRegistry::new(10);
    // model authored in centimeters
    let model = AABB::new(Vec3::ZERO, Vec3::new(200.0, 80.0, 90.0));

    let outcome = resolver().place(POINTER, &sofa(), Some(&model), &mut registry, &tracking).unwrap();

    assert!((outcome.scale.scale - 0.01).abs() < 1e-6);
    assert_eq!(outcome.scale.accuracy.tier, AccuracyTier::High);
    let instance = registry.get(outcome.key).unwrap();
    assert_eq!(instance.scale(), outcome.transform.scale);
    assert_eq!(instance.spec().id(), "sofa");

    // centimeter bounds at 0.01 cover the sofa's real size
    let size = instance.estimated_world_bounds().size();
    assert!((size - Vec3::new(2.0, 0.8, 0.9)).length() < 1e-4, "world size {:?}", size);
    assert!((instance.half_height() - 0.4).abs() < 1e-5);
    assert!(instance.bottom().abs() < 1e-5);
}

#[test]
fn test_place_with_uniform_fit_rests_on_floor() {
    let tracking = MockTracking::with_floor().hit_exact(Vec3::ZERO);
    let mut registry = PlacementRegistry::new(10);
    // twice as wide as the sofa: uniform fit gives 0.5, so 0.4 m tall
    let model = AABB::new(Vec3::ZERO, Vec3::new(4.0, 0.8, 0.9));

    let outcome = resolver().place(POINTER, &sofa(), Some(&model), &mut registry, &tracking).unwrap();

    let instance = registry.get(outcome.key).unwrap();
    assert!((instance.scale() - 0.5).abs() < 1e-6);
    assert!((instance.position().y - 0.2).abs() < 1e-5);
    assert!(instance.bottom().abs() < 1e-5);
    assert_eq!(outcome.transform.position, instance.position());
}

#[test]
fn test_place_without_bounds_uses_default_scale() {
    let tracking = MockTracking::with_floor().hit_exact(Vec3::ZERO);
    let mut registry = PlacementRegistry::new(10);

    let outcome = resolver().place(POINTER, &sofa(), None, &mut registry, &tracking).unwrap();
    assert!(outcome.scale.accuracy.fallback_used);
    assert_eq!(registry.get(outcome.key).unwrap().scale(), 1.0);
}
