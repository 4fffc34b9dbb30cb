//! Scale module
//!
//! Converts measured model bounds plus a real-world target size into a
//! render scale, with accuracy and plausibility reporting.

mod scale_calculator;
mod plausibility;

pub use scale_calculator::{
    ScaleCalculator, ScalingStrategy, AccuracyTier, AccuracyReport, ScaleResult,
};
pub use plausibility::{
    Axis, DimensionRange, PlausibilityRange, PlausibilityTable, PlausibilityWarning,
};
