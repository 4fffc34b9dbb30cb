/// Category-specific plausibility ranges.
///
/// Generated or scanned assets are often imperfect, so a scaled size
/// outside the empirical range for its category is only a warning.

use serde::{Deserialize, Serialize};
use crate::catalog::{Category, Size3};

/// Axis of a real-world size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
    Depth,
}

/// Inclusive range in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionRange {
    pub min: f32,
    pub max: f32,
}

impl DimensionRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Plausible width/height/depth for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlausibilityRange {
    pub width: DimensionRange,
    pub height: DimensionRange,
    pub depth: DimensionRange,
}

impl PlausibilityRange {
    pub const fn new(width: DimensionRange, height: DimensionRange, depth: DimensionRange) -> Self {
        Self { width, height, depth }
    }

    /// Check a size against this range, one warning per offending axis
    pub fn check(&self, category: Category, size: Size3) -> Vec<PlausibilityWarning> {
        [
            (Axis::Width, size.width, self.width),
            (Axis::Height, size.height, self.height),
            (Axis::Depth, size.depth, self.depth),
        ]
        .into_iter()
        .filter(|(_, value, range)| !range.contains(*value))
        .map(|(axis, value, range)| PlausibilityWarning { category, axis, value, range })
        .collect()
    }
}

/// One out-of-range dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityWarning {
    pub category: Category,
    pub axis: Axis,
    /// Scaled size on this axis in meters
    pub value: f32,
    pub range: DimensionRange,
}

/// Empirical plausibility ranges, one per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlausibilityTable {
    pub sofa: PlausibilityRange,
    pub table: PlausibilityRange,
    pub chair: PlausibilityRange,
    pub storage: PlausibilityRange,
    pub generic: PlausibilityRange,
}

impl PlausibilityTable {
    /// Range for a category
    pub fn range(&self, category: Category) -> &PlausibilityRange {
        match category {
            Category::Sofa => &self.sofa,
            Category::Table => &self.table,
            Category::Chair => &self.chair,
            Category::Storage => &self.storage,
            Category::Generic => &self.generic,
        }
    }

    pub fn check(&self, category: Category, size: Size3) -> Vec<PlausibilityWarning> {
        self.range(category).check(category, size)
    }
}

impl Default for PlausibilityTable {
    fn default() -> Self {
        Self {
            sofa: PlausibilityRange::new(
                DimensionRange::new(1.2, 3.5),
                DimensionRange::new(0.6, 1.2),
                DimensionRange::new(0.7, 1.2),
            ),
            table: PlausibilityRange::new(
                DimensionRange::new(0.4, 3.0),
                DimensionRange::new(0.3, 1.2),
                DimensionRange::new(0.4, 1.5),
            ),
            chair: PlausibilityRange::new(
                DimensionRange::new(0.3, 1.0),
                DimensionRange::new(0.6, 1.3),
                DimensionRange::new(0.3, 1.0),
            ),
            storage: PlausibilityRange::new(
                DimensionRange::new(0.3, 3.0),
                DimensionRange::new(0.3, 2.5),
                DimensionRange::new(0.2, 1.0),
            ),
            generic: PlausibilityRange::new(
                DimensionRange::new(0.01, 10.0),
                DimensionRange::new(0.01, 10.0),
                DimensionRange::new(0.01, 10.0),
            ),
        }
    }
}
