/// Tests for ScaleCalculator
///
/// These tests validate every strategy, clamping, accuracy tiers,
/// plausibility warnings and the unavailable-bounds fallback.

use super::*;
use crate::catalog::{FurnitureSpecDesc, FurnitureMetadata};
use crate::scale::Axis;
use glam::Vec3;

// ============================================================================
// Helper Functions
// ============================================================================

fn bounds(w: f32, h: f32, d: f32) -> AABB {
    AABB::new(Vec3::ZERO, Vec3::new(w, h, d))
}

fn calculator() -> ScaleCalculator {
    ScaleCalculator::new(ScaleConfig::default())
}

fn compute(model: AABB, target: Size3, strategy: ScalingStrategy) -> ScaleResult {
    calculator().compute_scale(Some(&model), target, strategy, 0.0001, 10_000.0, 1.0)
}

// ============================================================================
// Strategies
// ============================================================================

#[test]
fn test_uniform_uses_smallest_ratio() {
    // ratios: 2/1 = 2, 1/1 = 1, 3/1 = 3
    let result = compute(bounds(1.0, 1.0, 1.0), Size3::new(2.0, 1.0, 3.0), ScalingStrategy::Uniform);
    assert!((result.scale - 1.0).abs() < 1e-6);
}

#[test]
fn test_uniform_never_exceeds_target() {
    let models = [
        bounds(1.0, 2.0, 3.0),
        bounds(0.01, 0.5, 0.02),
        bounds(120.0, 80.0, 45.0),
        bounds(3.3, 0.7, 1.9),
    ];
    let targets = [
        Size3::new(2.0, 0.85, 0.9),
        Size3::new(0.5, 0.9, 0.5),
        Size3::new(1.0, 1.8, 0.45),
        Size3::new(0.01, 3.0, 7.5),
    ];

    for model in &models {
        for target in &targets {
            let result = compute(*model, *target, ScalingStrategy::Uniform);
            let scaled = model.size() * result.scale;
            let t = target.to_vec3();
            for axis in 0..3 {
                assert!(
                    scaled[axis] <= t[axis] * (1.0 + 1e-5),
                    "axis {} exceeded: {} > {}", axis, scaled[axis], t[axis]
                );
            }
        }
    }
}

#[test]
fn test_fit_largest_dimension() {
    // largest model axis is depth (4.0) -> 2.0 / 4.0
    let result = compute(bounds(1.0, 2.0, 4.0), Size3::new(1.0, 1.0, 2.0), ScalingStrategy::FitLargestDimension);
    assert!((result.scale - 0.5).abs() < 1e-6);
}

#[test]
fn test_fit_volume() {
    // model volume 1, target volume 8 -> cube root 2
    let result = compute(bounds(1.0, 1.0, 1.0), Size3::new(2.0, 2.0, 2.0), ScalingStrategy::FitVolume);
    assert!((result.scale - 2.0).abs() < 1e-5);
}

#[test]
fn test_average_dimensions() {
    // model mean 2, target mean 1
    let result = compute(bounds(1.0, 2.0, 3.0), Size3::new(0.5, 1.0, 1.5), ScalingStrategy::AverageDimensions);
    assert!((result.scale - 0.5).abs() < 1e-6);
}

#[test]
fn test_strategy_from_name() {
    assert_eq!(ScalingStrategy::from_name("uniform"), Some(ScalingStrategy::Uniform));
    assert_eq!(ScalingStrategy::from_name("fitLargestDimension"), Some(ScalingStrategy::FitLargestDimension));
    assert_eq!(ScalingStrategy::from_name("fit_volume"), Some(ScalingStrategy::FitVolume));
    assert_eq!(ScalingStrategy::from_name("average-dimensions"), Some(ScalingStrategy::AverageDimensions));
    assert_eq!(ScalingStrategy::from_name("squash"), None);
}

// ============================================================================
// Clamping
// ============================================================================

#[test]
fn test_result_clamped_to_max() {
    let result = calculator().compute_scale(
        Some(&bounds(0.01, 0.01, 0.01)), Size3::new(1.0, 1.0, 1.0),
        ScalingStrategy::Uniform, 0.5, 2.0, 1.0,
    );
    assert_eq!(result.scale, 2.0);
    assert!(result.accuracy.clamped);
    assert_eq!(result.accuracy.tier, AccuracyTier::Low);
}

#[test]
fn test_result_clamped_to_min() {
    let result = calculator().compute_scale(
        Some(&bounds(100.0, 100.0, 100.0)), Size3::new(1.0, 1.0, 1.0),
        ScalingStrategy::Uniform, 0.5, 2.0, 1.0,
    );
    assert_eq!(result.scale, 0.5);
    assert!(result.accuracy.clamped);
}

// ============================================================================
// Accuracy
// ============================================================================

#[test]
fn test_exact_fit_is_high_accuracy() {
    let result = compute(bounds(1.0, 0.5, 0.5), Size3::new(2.0, 1.0, 1.0), ScalingStrategy::Uniform);
    assert_eq!(result.accuracy.tier, AccuracyTier::High);
    assert!(result.accuracy.max_error < 1e-6);
    assert!(!result.accuracy.fallback_used);
    assert!(!result.accuracy.clamped);
}

#[test]
fn test_medium_accuracy() {
    // uniform picks 1.0 (height); width ends 10% short
    let result = compute(bounds(0.9, 1.0, 1.0), Size3::new(1.0, 1.0, 1.0), ScalingStrategy::Uniform);
    assert_eq!(result.accuracy.tier, AccuracyTier::Medium);
    assert!((result.accuracy.per_axis_error.x - 0.1).abs() < 1e-5);
}

#[test]
fn test_low_accuracy_does_not_block() {
    let result = compute(bounds(0.5, 1.0, 1.0), Size3::new(1.0, 1.0, 1.0), ScalingStrategy::Uniform);
    assert_eq!(result.accuracy.tier, AccuracyTier::Low);
    assert!(result.scale > 0.0);
}

#[test]
fn test_classify_thresholds() {
    let calc = calculator();
    assert_eq!(calc.classify(0.0), AccuracyTier::High);
    assert_eq!(calc.classify(0.049), AccuracyTier::High);
    assert_eq!(calc.classify(0.05), AccuracyTier::Medium);
    assert_eq!(calc.classify(0.149), AccuracyTier::Medium);
    assert_eq!(calc.classify(0.15), AccuracyTier::Low);
}

// ============================================================================
// Fallback
// ============================================================================

#[test]
fn test_missing_bounds_uses_default_scale() {
    let result = calculator().compute_scale(
        None, Size3::new(1.0, 1.0, 1.0), ScalingStrategy::Uniform, 0.5, 2.0, 1.25,
    );
    assert_eq!(result.scale, 1.25);
    assert!(result.accuracy.fallback_used);
}

#[test]
fn test_degenerate_bounds_uses_default_scale() {
    let flat = bounds(1.0, 0.0, 1.0);
    let result = calculator().compute_scale(
        Some(&flat), Size3::new(1.0, 1.0, 1.0), ScalingStrategy::Uniform, 0.5, 2.0, 1.0,
    );
    assert!(result.accuracy.fallback_used);
    assert_eq!(result.scale, 1.0);
}

// ============================================================================
// Spec + plausibility
// ============================================================================

fn chair_spec(width: f32) -> FurnitureSpec {
    FurnitureSpec::from_desc(FurnitureSpecDesc {
        id: "chair".to_string(),
        name: "Chair".to_string(),
        category: Category::Chair,
        real_size: Size3::new(width, 0.9, 0.5),
        default_scale: 1.0,
        min_scale: 0.001,
        max_scale: 1000.0,
        metadata: FurnitureMetadata::default(),
    }).unwrap()
}

#[test]
fn test_plausible_chair_has_no_warnings() {
    let spec = chair_spec(0.5);
    let result = calculator().compute_for_spec(Some(&bounds(50.0, 90.0, 50.0)), &spec);
    assert!((result.scale - 0.01).abs() < 1e-6);
    assert!(result.is_plausible());
}

#[test]
fn test_oversized_chair_warns_but_still_scales() {
    let spec = chair_spec(1.6);
    let result = calculator().compute_for_spec(Some(&bounds(1.6, 0.9, 0.5)), &spec);
    assert!((result.scale - 1.0).abs() < 1e-6);
    assert_eq!(result.plausibility.len(), 1);
    assert_eq!(result.plausibility[0].axis, Axis::Width);
    assert_eq!(result.plausibility[0].category, Category::Chair);
}

#[test]
fn test_spec_strategy_is_used() {
    let mut desc = FurnitureSpecDesc::with_defaults("cube", Category::Generic);
    desc.real_size = Size3::new(2.0, 2.0, 2.0);
    desc.metadata.scaling_strategy = Some(ScalingStrategy::FitVolume);
    let spec = FurnitureSpec::from_desc(desc).unwrap();

    let result = calculator().compute_for_spec(Some(&bounds(1.0, 1.0, 1.0)), &spec);
    assert!((result.scale - 2.0).abs() < 1e-5);
}
