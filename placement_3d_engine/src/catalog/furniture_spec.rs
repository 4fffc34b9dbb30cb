/// Immutable furniture catalog entries.
///
/// A FurnitureSpec is created once at catalog load and shared read-only
/// (`Arc<FurnitureSpec>`) by every placed instance that references it.

use serde::{Deserialize, Serialize};
use glam::Vec3;
use crate::error::{Error, Result};
use crate::scale::{ScalingStrategy, AccuracyTier};

// ===== CATEGORY =====

/// Furniture category. Drives repair defaults and plausibility ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sofa,
    Table,
    Chair,
    Storage,
    /// Generic or test object (no meaningful plausibility range)
    #[serde(alias = "test")]
    Generic,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 5] = [
        Category::Sofa,
        Category::Table,
        Category::Chair,
        Category::Storage,
        Category::Generic,
    ];

    /// Parse a category name (case-insensitive). `test` maps to Generic.
    pub fn from_name(name: &str) -> Option<Category> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sofa" | "couch" => Some(Category::Sofa),
            "table" | "desk" => Some(Category::Table),
            "chair" | "stool" => Some(Category::Chair),
            "storage" | "cabinet" | "shelf" => Some(Category::Storage),
            "generic" | "test" => Some(Category::Generic),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Category::Sofa => "Sofa",
            Category::Table => "Table",
            Category::Chair => "Chair",
            Category::Storage => "Storage",
            Category::Generic => "Generic",
        }
    }

    /// Typical real-world size used to repair missing or invalid dimensions
    pub fn default_size(&self) -> Size3 {
        match self {
            Category::Sofa => Size3::new(2.0, 0.85, 0.9),
            Category::Table => Size3::new(1.2, 0.75, 0.8),
            Category::Chair => Size3::new(0.5, 0.9, 0.5),
            Category::Storage => Size3::new(1.0, 1.8, 0.45),
            Category::Generic => Size3::new(0.5, 0.5, 0.5),
        }
    }
}

// ===== SIZE3 =====

/// Real-world size in meters (width = X, height = Y, depth = Z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size3 {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Size3 {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    /// Size as a vector (x = width, y = height, z = depth)
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Whether every dimension is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        [self.width, self.height, self.depth]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
    }

    pub fn volume(&self) -> f32 {
        self.width * self.height * self.depth
    }
}

// ===== METADATA =====

/// Optional descriptive metadata attached to a catalog entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FurnitureMetadata {
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub material: Option<String>,
    /// Weight in kilograms
    pub weight_kg: Option<f32>,
    /// Strategy to use when fitting the model to `real_size`
    pub scaling_strategy: Option<ScalingStrategy>,
    /// Accuracy the asset author expects from the fit
    pub expected_accuracy: Option<AccuracyTier>,
}

// ===== DESCRIPTOR =====

/// Descriptor used to build a FurnitureSpec
#[derive(Debug, Clone)]
pub struct FurnitureSpecDesc {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub real_size: Size3,
    pub default_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub metadata: FurnitureMetadata,
}

impl FurnitureSpecDesc {
    /// Descriptor with category defaults (size, unit scale, [0.1, 10] bounds)
    pub fn with_defaults(id: &str, category: Category) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            category,
            real_size: category.default_size(),
            default_scale: FurnitureSpec::DEFAULT_SCALE,
            min_scale: FurnitureSpec::DEFAULT_MIN_SCALE,
            max_scale: FurnitureSpec::DEFAULT_MAX_SCALE,
            metadata: FurnitureMetadata::default(),
        }
    }
}

// ===== FURNITURE SPEC =====

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct FurnitureSpec {
    id: String,
    name: String,
    category: Category,
    real_size: Size3,
    default_scale: f32,
    min_scale: f32,
    max_scale: f32,
    metadata: FurnitureMetadata,
}

impl FurnitureSpec {
    pub const DEFAULT_SCALE: f32 = 1.0;
    pub const DEFAULT_MIN_SCALE: f32 = 0.1;
    pub const DEFAULT_MAX_SCALE: f32 = 10.0;

    /// Build a spec from a descriptor, rejecting anything that breaks
    /// the data model (no repair happens here; see `Catalog`).
    pub fn from_desc(desc: FurnitureSpecDesc) -> Result<Self> {
        if desc.id.trim().is_empty() {
            return Err(Error::InvalidSpec("empty id".to_string()));
        }
        if !desc.real_size.is_valid() {
            return Err(Error::InvalidSpec(format!(
                "'{}': dimensions must be positive, got {:?}", desc.id, desc.real_size
            )));
        }
        let scales_finite = [desc.default_scale, desc.min_scale, desc.max_scale]
            .iter()
            .all(|s| s.is_finite() && *s > 0.0);
        if !scales_finite || desc.min_scale >= desc.max_scale {
            return Err(Error::InvalidSpec(format!(
                "'{}': invalid scale bounds [{}, {}]", desc.id, desc.min_scale, desc.max_scale
            )));
        }
        if desc.default_scale < desc.min_scale || desc.default_scale > desc.max_scale {
            return Err(Error::InvalidSpec(format!(
                "'{}': default scale {} outside [{}, {}]",
                desc.id, desc.default_scale, desc.min_scale, desc.max_scale
            )));
        }

        Ok(Self {
            id: desc.id,
            name: desc.name,
            category: desc.category,
            real_size: desc.real_size,
            default_scale: desc.default_scale,
            min_scale: desc.min_scale,
            max_scale: desc.max_scale,
            metadata: desc.metadata,
        })
    }

    // ===== ACCESSORS =====

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Target real-world size in meters
    pub fn real_size(&self) -> Size3 {
        self.real_size
    }

    pub fn default_scale(&self) -> f32 {
        self.default_scale
    }

    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    pub fn metadata(&self) -> &FurnitureMetadata {
        &self.metadata
    }

    /// Preferred scaling strategy (Uniform when the entry does not say)
    pub fn scaling_strategy(&self) -> ScalingStrategy {
        self.metadata.scaling_strategy.unwrap_or_default()
    }

    /// Clamp a render scale into this spec's allowed range
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}
