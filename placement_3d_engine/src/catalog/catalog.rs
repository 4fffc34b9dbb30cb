/// Furniture catalog loading, validation and repair.
///
/// The catalog document is JSON:
///
/// ```text
/// {
///   "furniture": [
///     {
///       "id": "sofa_modern",
///       "name": "Modern Sofa",
///       "category": "sofa",
///       "dimensions": { "width": 2.1, "height": 0.85, "depth": 0.95 },
///       "default_scale": 1.0, "min_scale": 0.5, "max_scale": 2.0,
///       "metadata": { "tags": ["living"], "scaling_strategy": "uniform" }
///     }
///   ]
/// }
/// ```
///
/// Each entry is parsed on its own. A missing or non-positive dimension,
/// unknown category or broken scale range is repaired from category
/// defaults; entries without an id, duplicates and entries that do not
/// parse are dropped. Every repair or drop produces a warning and loading
/// continues.

use std::path::Path;
use std::sync::Arc;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use crate::error::{Error, Result};
use crate::scale::{ScalingStrategy, AccuracyTier};
use super::furniture_spec::{
    Category, FurnitureMetadata, FurnitureSpec, FurnitureSpecDesc, Size3,
};

const LOG_SOURCE: &str = "placement3d::Catalog";

// ===== DOCUMENT SCHEMA =====

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default, alias = "items")]
    furniture: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DimensionsDoc {
    width: Option<f32>,
    height: Option<f32>,
    depth: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetadataDoc {
    description: Option<String>,
    tags: Vec<String>,
    material: Option<String>,
    weight_kg: Option<f32>,
    scaling_strategy: Option<String>,
    expected_accuracy: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FurnitureEntryDoc {
    id: Option<String>,
    name: Option<String>,
    category: Option<String>,
    dimensions: Option<DimensionsDoc>,
    default_scale: Option<f32>,
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    metadata: Option<MetadataDoc>,
}

// ===== LOAD REPORT =====

/// A repair or drop that happened while loading the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogWarning {
    /// Position of the entry in the document
    pub entry_index: usize,
    /// Entry id, when it had one
    pub spec_id: Option<String>,
    pub message: String,
    /// True when the entry was dropped rather than repaired
    pub dropped: bool,
}

/// Result of loading a catalog document
#[derive(Debug)]
pub struct CatalogLoadReport {
    pub catalog: Catalog,
    pub warnings: Vec<CatalogWarning>,
}

impl CatalogLoadReport {
    /// Number of entries dropped during load
    pub fn dropped_count(&self) -> usize {
        self.warnings.iter().filter(|w| w.dropped).count()
    }
}

// ===== CATALOG =====

/// Validated, ordered collection of furniture specs
#[derive(Debug, Default)]
pub struct Catalog {
    specs: Vec<Arc<FurnitureSpec>>,
    index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-validated specs. Duplicate ids are rejected.
    pub fn from_specs(specs: Vec<FurnitureSpec>) -> Result<Self> {
        let mut catalog = Self::new();
        for spec in specs {
            if catalog.index.contains_key(spec.id()) {
                return Err(Error::InvalidSpec(format!("duplicate id '{}'", spec.id())));
            }
            catalog.push(spec);
        }
        Ok(catalog)
    }

    /// Parse, validate and repair a JSON catalog document.
    ///
    /// Only a document that is not JSON at all (or whose `furniture` field
    /// is not an array) fails; individual bad entries become warnings.
    pub fn from_json_str(json: &str) -> Result<CatalogLoadReport> {
        let document: CatalogDocument = serde_json::from_str(json).map_err(|e| {
            crate::engine_error!(LOG_SOURCE, "Catalog document rejected: {}", e);
            Error::CatalogParse(e.to_string())
        })?;

        let mut catalog = Self::new();
        let mut warnings = Vec::new();

        for (entry_index, value) in document.furniture.into_iter().enumerate() {
            let entry: FurnitureEntryDoc = match serde_json::from_value(value) {
                Ok(entry) => entry,
                Err(e) => {
                    warnings.push(CatalogWarning {
                        entry_index,
                        spec_id: None,
                        message: format!("entry does not parse: {}", e),
                        dropped: true,
                    });
                    continue;
                }
            };

            if let Some(desc) = Self::repair_entry(entry_index, entry, &catalog, &mut warnings) {
                let id = desc.id.clone();
                match FurnitureSpec::from_desc(desc) {
                    Ok(spec) => catalog.push(spec),
                    Err(e) => warnings.push(CatalogWarning {
                        entry_index,
                        spec_id: Some(id),
                        message: e.to_string(),
                        dropped: true,
                    }),
                }
            }
        }

        for warning in &warnings {
            crate::engine_warn!(
                LOG_SOURCE,
                "Entry #{} ({}): {}{}",
                warning.entry_index,
                warning.spec_id.as_deref().unwrap_or("<no id>"),
                warning.message,
                if warning.dropped { " [dropped]" } else { "" }
            );
        }
        crate::engine_info!(
            LOG_SOURCE,
            "Catalog loaded: {} entries, {} warnings",
            catalog.len(),
            warnings.len()
        );

        Ok(CatalogLoadReport { catalog, warnings })
    }

    /// Read and load a catalog document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<CatalogLoadReport> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            crate::engine_error!(LOG_SOURCE, "Cannot read catalog {}: {}", path.display(), e);
            Error::CatalogParse(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Turn a raw document entry into a valid descriptor, or drop it.
    fn repair_entry(
        entry_index: usize,
        entry: FurnitureEntryDoc,
        catalog: &Catalog,
        warnings: &mut Vec<CatalogWarning>,
    ) -> Option<FurnitureSpecDesc> {
        let id = match entry.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                warnings.push(CatalogWarning {
                    entry_index,
                    spec_id: None,
                    message: "missing id".to_string(),
                    dropped: true,
                });
                return None;
            }
        };

        if catalog.contains(&id) {
            warnings.push(CatalogWarning {
                entry_index,
                spec_id: Some(id),
                message: "duplicate id".to_string(),
                dropped: true,
            });
            return None;
        }

        let mut warn = |message: String| {
            warnings.push(CatalogWarning {
                entry_index,
                spec_id: Some(id.clone()),
                message,
                dropped: false,
            });
        };

        let category = match entry.category.as_deref() {
            None => Category::Generic,
            Some(name) => Category::from_name(name).unwrap_or_else(|| {
                warn(format!("unknown category '{}', using Generic", name));
                Category::Generic
            }),
        };

        let name = match entry.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => id.clone(),
        };

        // Dimensions
        let defaults = category.default_size();
        let dims = entry.dimensions.unwrap_or_default();
        let mut repair_dimension = |label: &str, value: Option<f32>, fallback: f32| -> f32 {
            match value {
                Some(v) if v.is_finite() && v > 0.0 => v,
                other => {
                    warn(format!(
                        "{} {} repaired to {} default {}",
                        label,
                        other.map_or("missing".to_string(), |v| format!("{} is invalid,", v)),
                        category.name(),
                        fallback
                    ));
                    fallback
                }
            }
        };
        let real_size = Size3::new(
            repair_dimension("width", dims.width, defaults.width),
            repair_dimension("height", dims.height, defaults.height),
            repair_dimension("depth", dims.depth, defaults.depth),
        );

        // Scale bounds
        let positive = |v: Option<f32>| v.filter(|s| s.is_finite() && *s > 0.0);
        let mut min_scale = positive(entry.min_scale).unwrap_or(FurnitureSpec::DEFAULT_MIN_SCALE);
        let mut max_scale = positive(entry.max_scale).unwrap_or(FurnitureSpec::DEFAULT_MAX_SCALE);
        if min_scale >= max_scale {
            warn(format!(
                "scale range [{}, {}] is empty, using [{}, {}]",
                min_scale, max_scale,
                FurnitureSpec::DEFAULT_MIN_SCALE, FurnitureSpec::DEFAULT_MAX_SCALE
            ));
            min_scale = FurnitureSpec::DEFAULT_MIN_SCALE;
            max_scale = FurnitureSpec::DEFAULT_MAX_SCALE;
        }
        let requested_default = positive(entry.default_scale).unwrap_or(FurnitureSpec::DEFAULT_SCALE);
        let default_scale = requested_default.clamp(min_scale, max_scale);
        if default_scale != requested_default {
            warn(format!(
                "default scale {} clamped to {}", requested_default, default_scale
            ));
        }

        // Metadata
        let meta = entry.metadata.unwrap_or_default();
        let weight_kg = match meta.weight_kg {
            Some(w) if !(w.is_finite() && w > 0.0) => {
                warn(format!("weight {} ignored", w));
                None
            }
            other => other,
        };
        let scaling_strategy = meta.scaling_strategy.as_deref().and_then(|s| {
            let parsed = ScalingStrategy::from_name(s);
            if parsed.is_none() {
                warn(format!("unknown scaling strategy '{}', using uniform", s));
            }
            parsed
        });
        let expected_accuracy = meta.expected_accuracy.as_deref().and_then(|s| {
            let parsed = AccuracyTier::from_name(s);
            if parsed.is_none() {
                warn(format!("unknown accuracy tier '{}' ignored", s));
            }
            parsed
        });

        Some(FurnitureSpecDesc {
            id,
            name,
            category,
            real_size,
            default_scale,
            min_scale,
            max_scale,
            metadata: FurnitureMetadata {
                description: meta.description,
                tags: meta.tags,
                material: meta.material,
                weight_kg,
                scaling_strategy,
                expected_accuracy,
            },
        })
    }

    fn push(&mut self, spec: FurnitureSpec) {
        self.index.insert(spec.id().to_string(), self.specs.len());
        self.specs.push(Arc::new(spec));
    }

    // ===== QUERIES =====

    /// Get a spec by id
    pub fn get(&self, id: &str) -> Option<&Arc<FurnitureSpec>> {
        self.index.get(id).map(|&i| &self.specs[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All specs in document order
    pub fn all(&self) -> impl Iterator<Item = &Arc<FurnitureSpec>> {
        self.specs.iter()
    }

    /// Specs of one category, in document order
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Arc<FurnitureSpec>> {
        self.specs.iter().filter(move |s| s.category() == category)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
