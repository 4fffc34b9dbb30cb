/// Real-world dimension to render scale conversion.
///
/// Given a model's measured bounding box (in model units) and a target
/// real-world size (in meters), computes the uniform render scale that makes
/// the model match the target, clamps it into the spec's allowed range and
/// reports how far the result is from the target on each axis.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::catalog::{Category, FurnitureSpec, Size3};
use crate::config::ScaleConfig;
use crate::scene::AABB;
use super::plausibility::PlausibilityWarning;

const LOG_SOURCE: &str = "placement3d::Scale";

/// Model extents below this are treated as "no measurement"
const MIN_MODEL_EXTENT: f32 = 1e-6;

// ===== STRATEGY =====

/// How the per-axis target/model ratios are reduced to one uniform scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingStrategy {
    /// Smallest per-axis ratio: keeps aspect ratio and never exceeds the
    /// target on any axis
    #[default]
    Uniform,
    /// Match only the model's largest axis
    FitLargestDimension,
    /// Cube root of the target/model volume ratio
    FitVolume,
    /// Ratio of the mean dimensions
    AverageDimensions,
}

impl ScalingStrategy {
    /// Parse a strategy name (snake_case or camelCase)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "uniform" => Some(Self::Uniform),
            "fitlargestdimension" | "largest" => Some(Self::FitLargestDimension),
            "fitvolume" | "volume" => Some(Self::FitVolume),
            "averagedimensions" | "average" => Some(Self::AverageDimensions),
            _ => None,
        }
    }

    /// Raw (unclamped) scale for a model size and a target size.
    ///
    /// Both sizes must be strictly positive on every axis.
    pub fn ratio(&self, model: Vec3, target: Vec3) -> f32 {
        match self {
            Self::Uniform => (target / model).min_element(),
            Self::FitLargestDimension => {
                let axis = if model.x >= model.y && model.x >= model.z {
                    0
                } else if model.y >= model.z {
                    1
                } else {
                    2
                };
                target[axis] / model[axis]
            }
            Self::FitVolume => {
                let model_volume = model.x * model.y * model.z;
                let target_volume = target.x * target.y * target.z;
                (target_volume / model_volume).cbrt()
            }
            Self::AverageDimensions => {
                let model_mean = (model.x + model.y + model.z) / 3.0;
                let target_mean = (target.x + target.y + target.z) / 3.0;
                target_mean / model_mean
            }
        }
    }
}

// ===== ACCURACY =====

/// Accuracy classification of a fitted scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyTier {
    /// Worst-axis error at or above the medium threshold
    Low,
    /// Worst-axis error below the medium threshold
    Medium,
    /// Worst-axis error below the high threshold
    High,
}

impl AccuracyTier {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Per-axis fit quality after clamping
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyReport {
    /// |scaled - target| / target, per axis (x = width, y = height, z = depth)
    pub per_axis_error: Vec3,
    /// Largest of the per-axis errors
    pub max_error: f32,
    pub tier: AccuracyTier,
    /// Resulting real-world size
    pub scaled_size: Size3,
    /// The bounding box was unavailable and the default scale was used
    pub fallback_used: bool,
    /// The raw ratio fell outside [min_scale, max_scale]
    pub clamped: bool,
}

/// Result of a scale computation
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleResult {
    pub scale: f32,
    pub accuracy: AccuracyReport,
    /// Out-of-range dimensions for the category (never blocks placement)
    pub plausibility: Vec<PlausibilityWarning>,
}

impl ScaleResult {
    pub fn is_plausible(&self) -> bool {
        self.plausibility.is_empty()
    }
}

// ===== CALCULATOR =====

/// Stateless scale calculator configured with accuracy thresholds and
/// plausibility ranges.
#[derive(Debug, Clone, Default)]
pub struct ScaleCalculator {
    config: ScaleConfig,
}

impl ScaleCalculator {
    pub fn new(config: ScaleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    /// Compute a clamped render scale and its accuracy report.
    ///
    /// `model_bounds` is the model's bounding box in model units. When it is
    /// missing or degenerate, `default_scale` (clamped) is returned with
    /// `fallback_used = true`. This never fails.
    pub fn compute_scale(
        &self,
        model_bounds: Option<&AABB>,
        target: Size3,
        strategy: ScalingStrategy,
        min_scale: f32,
        max_scale: f32,
        default_scale: f32,
    ) -> ScaleResult {
        let model = model_bounds
            .map(AABB::size)
            .filter(|m| m.is_finite() && m.min_element() > MIN_MODEL_EXTENT);

        let Some(model) = model else {
            crate::engine_debug!(LOG_SOURCE,
                "Model bounds unavailable, using default scale {}", default_scale);
            return ScaleResult {
                scale: default_scale.clamp(min_scale, max_scale),
                accuracy: AccuracyReport {
                    per_axis_error: Vec3::ZERO,
                    max_error: 0.0,
                    tier: AccuracyTier::Low,
                    scaled_size: target,
                    fallback_used: true,
                    clamped: false,
                },
                plausibility: Vec::new(),
            };
        };

        let target_vec = target.to_vec3();
        let raw = strategy.ratio(model, target_vec);
        let scale = raw.clamp(min_scale, max_scale);

        let scaled = model * scale;
        let per_axis_error = (scaled - target_vec).abs() / target_vec;
        let max_error = per_axis_error.max_element();
        let tier = self.classify(max_error);

        ScaleResult {
            scale,
            accuracy: AccuracyReport {
                per_axis_error,
                max_error,
                tier,
                scaled_size: Size3::from_vec3(scaled),
                fallback_used: false,
                clamped: scale != raw,
            },
            plausibility: Vec::new(),
        }
    }

    /// Compute the scale for a catalog spec: its target size, strategy and
    /// scale bounds, plus the category plausibility check.
    pub fn compute_for_spec(&self, model_bounds: Option<&AABB>, spec: &FurnitureSpec) -> ScaleResult {
        let mut result = self.compute_scale(
            model_bounds,
            spec.real_size(),
            spec.scaling_strategy(),
            spec.min_scale(),
            spec.max_scale(),
            spec.default_scale(),
        );

        if !result.accuracy.fallback_used && result.accuracy.tier == AccuracyTier::Low {
            crate::engine_warn!(LOG_SOURCE,
                "Low scale accuracy for '{}': worst axis off by {:.1}%",
                spec.id(), result.accuracy.max_error * 100.0);
        }

        result.plausibility = self.check_plausibility(spec.category(), result.accuracy.scaled_size);
        for warning in &result.plausibility {
            crate::engine_warn!(LOG_SOURCE,
                "'{}' {:?} of {:.2} m outside plausible {} range [{:.2}, {:.2}]",
                spec.id(), warning.axis, warning.value, spec.category().name(),
                warning.range.min, warning.range.max);
        }

        result
    }

    /// Check a real-world size against the category's plausibility range
    pub fn check_plausibility(&self, category: Category, size: Size3) -> Vec<PlausibilityWarning> {
        self.config.plausibility.check(category, size)
    }

    /// Classify a worst-axis relative error
    pub fn classify(&self, max_error: f32) -> AccuracyTier {
        if max_error < self.config.high_accuracy_threshold {
            AccuracyTier::High
        } else if max_error < self.config.medium_accuracy_threshold {
            AccuracyTier::Medium
        } else {
            AccuracyTier::Low
        }
    }
}

#[cfg(test)]
#[path = "scale_calculator_tests.rs"]
mod tests;
