/// Engine configuration.
///
/// Every numeric heuristic of the engine lives here with a sensible default.
/// The whole tree can be loaded from a (partial) JSON document; missing
/// fields keep their defaults.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::scale::PlausibilityTable;

const LOG_SOURCE: &str = "placement3d::Config";

// ===== REGISTRY =====

/// Placement registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of simultaneously placed instances
    pub max_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { max_capacity: 10 }
    }
}

// ===== PLACEMENT =====

/// Placement resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Yaw new instances so their front (+Z) faces the camera
    pub face_camera: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self { face_camera: true }
    }
}

// ===== SCALE =====

/// Scale calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Worst-axis relative error below which accuracy is High
    pub high_accuracy_threshold: f32,
    /// Worst-axis relative error below which accuracy is Medium
    pub medium_accuracy_threshold: f32,
    /// Plausible real-world dimensions per category
    pub plausibility: PlausibilityTable,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            high_accuracy_threshold: 0.05,
            medium_accuracy_threshold: 0.15,
            plausibility: PlausibilityTable::default(),
        }
    }
}

// ===== MANIPULATION =====

/// Manipulation controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationConfig {
    /// Radial step of the auto-position spiral, in meters
    pub auto_position_step: f32,
    /// Largest radius tried by auto-position, in meters
    pub auto_position_max_radius: f32,
    /// Number of candidate angles per ring
    pub auto_position_angular_steps: u32,
}

impl Default for ManipulationConfig {
    fn default() -> Self {
        Self {
            auto_position_step: 0.1,
            auto_position_max_radius: 2.0,
            auto_position_angular_steps: 12,
        }
    }
}

// ===== GOVERNOR =====

/// Performance governor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Instance count above which the oldest instances are evicted
    pub max_instances: usize,
    /// Frame rate below which shadows and highlights are disabled
    pub fps_threshold: f32,
    /// Memory use (MB) above which assets are evicted and detail reduced
    pub memory_threshold_mb: f32,
    /// Distance from the camera beyond which detail is reduced, in meters
    pub reduced_detail_distance: f32,
    /// How long metrics must stay healthy before quality is restored
    pub recovery_interval_ms: u64,
}

impl GovernorConfig {
    pub fn recovery_interval(&self) -> Duration {
        Duration::from_millis(self.recovery_interval_ms)
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            max_instances: 10,
            fps_threshold: 30.0,
            memory_threshold_mb: 500.0,
            reduced_detail_distance: 3.0,
            recovery_interval_ms: 2000,
        }
    }
}

// ===== POLL =====

/// Remote generation polling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between two polls of the same task
    pub interval_ms: u64,
    /// Polls attempted before a task times out
    pub max_retries: u32,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            max_retries: 60,
        }
    }
}

// ===== ENGINE =====

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub registry: RegistryConfig,
    pub placement: PlacementConfig,
    pub scale: ScaleConfig,
    pub manipulation: ManipulationConfig,
    pub governor: GovernorConfig,
    pub poll: PollConfig,
}

impl EngineConfig {
    /// Parse a JSON configuration document. Missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            crate::engine_error!(LOG_SOURCE, "Configuration rejected: {}", e);
            Error::ConfigParse(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Registry capacity the engine actually enforces: never above the
    /// governor's instance limit
    pub fn effective_capacity(&self) -> usize {
        self.registry.max_capacity.min(self.governor.max_instances)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| {
            crate::engine_error!(LOG_SOURCE, "Configuration rejected: {}", msg);
            Err(Error::ConfigParse(msg))
        };

        if self.registry.max_capacity == 0 {
            return fail("registry.max_capacity must be at least 1".to_string());
        }
        // A lower governor limit would evict instances placement accepted
        if self.governor.max_instances < self.registry.max_capacity {
            return fail(format!(
                "governor.max_instances ({}) must not be below registry.max_capacity ({})",
                self.governor.max_instances, self.registry.max_capacity
            ));
        }
        if !(self.scale.high_accuracy_threshold > 0.0
            && self.scale.high_accuracy_threshold <= self.scale.medium_accuracy_threshold)
        {
            return fail(format!(
                "accuracy thresholds must satisfy 0 < high <= medium, got {} / {}",
                self.scale.high_accuracy_threshold, self.scale.medium_accuracy_threshold
            ));
        }
        if !(self.manipulation.auto_position_step > 0.0)
            || self.manipulation.auto_position_angular_steps == 0
        {
            return fail("auto-position step and angular steps must be positive".to_string());
        }
        if self.poll.max_retries == 0 {
            return fail("poll.max_retries must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
