/// PlacementEngine - facade used by the presentation layer
///
/// Owns the registry and every component that decides something about
/// placed instances, plus the external collaborators (tracking, renderer,
/// asset repository) injected at construction. All methods run on the
/// owner thread; asset loads finish on worker threads and are applied by
/// `pump_asset_loads`.
///
/// # Example
///
/// ```ignore
/// use placement_3d_engine::placement3d::{EngineConfig, PlacementEngine};
/// use placement_3d_engine::placement3d::catalog::Catalog;
/// use placement_3d_engine::glam::Vec2;
///
/// let report = Catalog::load("catalog.json")?;
/// let mut engine = PlacementEngine::new(EngineConfig::default(), report.catalog, tracking, renderer)
///     .with_assets(repository);
///
/// let outcome = engine.place(Vec2::new(0.5, 0.5), "sofa_modern")?;
/// engine.select(outcome.key)?;
/// engine.pump_asset_loads();
/// ```

use std::sync::Arc;
use std::time::{Duration, Instant};
use glam::{Vec2, Vec3};
use crate::assets::{AssetLoadEvent, AssetLoader, AssetRepository};
use crate::catalog::{Catalog, Category, Size3};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::manipulation::{GestureEvent, ManipulationController, ManipulationState};
use crate::performance::{FrameSample, GovernorContext, GovernorReport, PerformanceGovernor};
use crate::placement::{PlacementOutcome, PlacementResolver, TrackingProvider};
use crate::scale::ScaleCalculator;
use crate::scene::{InstanceKey, InterferenceChecker, PlacementRegistry, QualityFlags, SceneRenderer};

const LOG_SOURCE: &str = "placement3d::Engine";

// ===== PRESENTATION TYPES =====

/// Snapshot of one placed instance for display
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceDetails {
    pub key: InstanceKey,
    pub spec_id: String,
    pub name: String,
    pub category: Category,
    pub position: Vec3,
    /// Rotation about the vertical axis, in degrees
    pub yaw_degrees: f32,
    pub scale: f32,
    /// Catalog real-world size
    pub real_size: Size3,
    pub is_manipulating: bool,
    /// The model has finished loading
    pub has_model: bool,
}

/// Number of placed instances of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

// ===== ENGINE =====

pub struct PlacementEngine {
    config: EngineConfig,
    catalog: Catalog,
    registry: PlacementRegistry,
    resolver: PlacementResolver,
    controller: ManipulationController,
    governor: PerformanceGovernor,
    tracking: Box<dyn TrackingProvider>,
    renderer: Box<dyn SceneRenderer>,
    assets: Option<AssetLoader>,
}

impl PlacementEngine {
    /// Create an engine without an asset repository: instances keep the
    /// catalog-derived bounds and default scale.
    pub fn new(
        config: EngineConfig,
        catalog: Catalog,
        tracking: Box<dyn TrackingProvider>,
        renderer: Box<dyn SceneRenderer>,
    ) -> Self {
        let scale_calculator = ScaleCalculator::new(config.scale.clone());
        let capacity = config.effective_capacity();
        if capacity < config.registry.max_capacity {
            crate::engine_warn!(LOG_SOURCE,
                "Capacity lowered from {} to the governor limit of {}",
                config.registry.max_capacity, capacity);
        }
        let engine = Self {
            registry: PlacementRegistry::new(capacity),
            resolver: PlacementResolver::new(config.placement.clone(), scale_calculator),
            controller: ManipulationController::new(config.manipulation.clone()),
            governor: PerformanceGovernor::new(config.governor.clone()),
            config,
            catalog,
            tracking,
            renderer,
            assets: None,
        };
        crate::engine_info!(LOG_SOURCE,
            "Engine ready: {} catalog entries, capacity {}",
            engine.catalog.len(), engine.registry.max_capacity());
        engine
    }

    /// Load models through `repository` for every new placement
    pub fn with_assets(mut self, repository: Arc<dyn AssetRepository>) -> Self {
        self.assets = Some(AssetLoader::new(repository));
        self
    }

    /// Helper to log errors produced by the engine itself before returning them
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::UnknownSpec(id) => {
                crate::engine_error!(LOG_SOURCE, "Unknown furniture spec '{}'", id);
            }
            Error::UnknownInstance(key) => {
                crate::engine_error!(LOG_SOURCE, "Unknown instance {:?}", key);
            }
            Error::NoSelection => {
                crate::engine_warn!(LOG_SOURCE, "Operation requires a selected instance");
            }
            Error::LoadFailed { spec_id, reason } => {
                crate::engine_error!(LOG_SOURCE, "Model for '{}' unavailable: {}", spec_id, reason);
            }
            _ => {
                crate::engine_error!(LOG_SOURCE, "{}", error);
            }
        }
        error
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &PlacementRegistry {
        &self.registry
    }

    pub fn state(&self) -> ManipulationState {
        self.controller.state()
    }

    pub fn is_degraded(&self) -> bool {
        self.governor.is_degraded()
    }

    // ===== PLACEMENT =====

    /// Place a new instance of catalog entry `spec_id` at a screen point.
    ///
    /// # Errors
    ///
    /// - `UnknownSpec` if the catalog has no such entry
    /// - `CapacityExceeded` if the registry is full
    /// - `NoSurfaceFound` if the point hits no surface
    pub fn place(&mut self, screen_point: Vec2, spec_id: &str) -> Result<PlacementOutcome> {
        let spec = self
            .catalog
            .get(spec_id)
            .cloned()
            .ok_or_else(|| Self::log_and_return_error(Error::UnknownSpec(spec_id.to_string())))?;

        let outcome = self.resolver.place(
            screen_point,
            &spec,
            None,
            &mut self.registry,
            self.tracking.as_ref(),
        )?;

        // Effects stay off for new instances while the governor is degrading
        if self.governor.is_degraded() {
            if let Some(instance) = self.registry.get_mut(outcome.key) {
                instance.set_quality_flags(QualityFlags::empty());
            }
            self.renderer.set_shadow_visible(outcome.key, false);
        }

        if let Some(loader) = self.assets.as_mut() {
            loader.request(outcome.key, spec_id);
        }
        Ok(outcome)
    }

    // ===== SELECTION =====

    /// Toggle selection of `key`
    pub fn select(&mut self, key: InstanceKey) -> Result<ManipulationState> {
        self.controller
            .select(key, &mut self.registry, self.renderer.as_mut())
            .map_err(Self::log_and_return_error)
    }

    pub fn deselect(&mut self, key: InstanceKey) -> ManipulationState {
        self.controller.deselect(key, &mut self.registry, self.renderer.as_mut())
    }

    /// Details of the selected instance, if any
    pub fn selected_instance(&self) -> Option<InstanceDetails> {
        let key = self.controller.selected()?;
        let instance = self.registry.get(key)?;
        let spec = instance.spec();
        Some(InstanceDetails {
            key,
            spec_id: spec.id().to_string(),
            name: spec.name().to_string(),
            category: spec.category(),
            position: instance.position(),
            yaw_degrees: instance.transform().yaw().to_degrees(),
            scale: instance.scale(),
            real_size: spec.real_size(),
            is_manipulating: instance.is_manipulating(),
            has_model: instance.renderable().is_some(),
        })
    }

    // ===== DELETION =====

    /// Remove one instance
    pub fn delete_instance(&mut self, key: InstanceKey) -> Result<()> {
        if !self.registry.remove(key) {
            return Err(Self::log_and_return_error(Error::UnknownInstance(key)));
        }
        self.controller.forget(key);
        crate::engine_info!(LOG_SOURCE, "Deleted {:?}", key);
        Ok(())
    }

    /// Remove the selected instance and return its key
    pub fn delete_selected(&mut self) -> Result<InstanceKey> {
        let key = self
            .controller
            .selected()
            .ok_or_else(|| Self::log_and_return_error(Error::NoSelection))?;
        self.delete_instance(key)?;
        Ok(key)
    }

    /// Remove every instance. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        self.controller.deselect_all(&mut self.registry, self.renderer.as_mut());
        let removed = self.registry.len();
        self.registry.clear();
        crate::engine_info!(LOG_SOURCE, "Cleared {} instances", removed);
        removed
    }

    // ===== QUERIES =====

    pub fn instance_count(&self) -> usize {
        self.registry.len()
    }

    pub fn capacity_remaining(&self) -> usize {
        self.registry.capacity_remaining()
    }

    /// Placed instances per category, in category display order. Categories
    /// with no instance are omitted.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        Category::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                count: self
                    .registry
                    .all()
                    .filter(|(_, instance)| instance.spec().category() == category)
                    .count(),
            })
            .filter(|c| c.count > 0)
            .collect()
    }

    /// Every pair of currently overlapping instances, in insertion order
    pub fn interfering_pairs(&self) -> Vec<(InstanceKey, InstanceKey)> {
        InterferenceChecker::all_interfering_pairs(&self.registry, self.renderer.as_ref())
    }

    // ===== MANIPULATION =====

    /// Feed one gesture event to the manipulation state machine
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Result<ManipulationState> {
        let surfaces = self.tracking.detected_surfaces();
        self.controller
            .handle(event, &mut self.registry, self.renderer.as_mut(), &surfaces)
    }

    /// Move `key` to the nearest free spot around its current position
    pub fn auto_position(&mut self, key: InstanceKey) -> Result<Vec3> {
        self.controller
            .auto_position(key, &mut self.registry, self.renderer.as_ref())
    }

    // ===== FRAME LOOP =====

    /// Feed one frame sample to the performance governor.
    ///
    /// Evicted instances are dropped from the selection.
    pub fn tick(&mut self, fps: f32, memory_mb: f32, elapsed: Duration) -> GovernorReport {
        let sample = FrameSample {
            fps,
            memory_mb,
            instance_count: self.registry.len(),
            elapsed,
        };
        let mut ctx = GovernorContext {
            registry: &mut self.registry,
            renderer: self.renderer.as_mut(),
            assets: self.assets.as_ref().map(|loader| loader.repository().as_ref()),
            camera_position: self.tracking.camera_position(),
        };
        let report = self.governor.tick(sample, &mut ctx);

        for &key in &report.evicted {
            self.controller.forget(key);
        }
        report
    }

    /// Apply every finished model load without blocking.
    ///
    /// Returns one `LoadFailed` per failed load; other instances are not
    /// affected. Loads for instances removed meanwhile are discarded.
    pub fn pump_asset_loads(&mut self) -> Vec<Error> {
        let events = match self.assets.as_mut() {
            Some(loader) => loader.drain(),
            None => return Vec::new(),
        };
        events
            .into_iter()
            .filter_map(|event| self.apply_load(event).err())
            .collect()
    }

    /// Block until every in-flight load has finished or `timeout` elapses,
    /// applying results as they arrive.
    pub fn wait_for_asset_loads(&mut self, timeout: Duration) -> Vec<Error> {
        let deadline = Instant::now() + timeout;
        let mut errors = Vec::new();
        loop {
            let Some(loader) = self.assets.as_mut() else { break };
            if loader.pending_count() == 0 {
                break;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                crate::engine_warn!(LOG_SOURCE,
                    "{} model loads still pending after {:?}", loader.pending_count(), timeout);
                break;
            }
            if let Some(event) = loader.next_event(remaining) {
                if let Err(e) = self.apply_load(event) {
                    errors.push(e);
                }
            }
        }
        errors
    }

    /// Number of model loads still in flight
    pub fn pending_asset_loads(&self) -> usize {
        self.assets.as_ref().map_or(0, AssetLoader::pending_count)
    }

    fn apply_load(&mut self, event: AssetLoadEvent) -> Result<()> {
        let Some(instance) = self.registry.get_mut(event.key) else {
            crate::engine_debug!(LOG_SOURCE,
                "Discarding model '{}' for removed instance {:?}", event.spec_id, event.key);
            return Ok(());
        };

        match event.result {
            Ok(handle) => {
                let bounds = handle.model_bounds();
                let result = self
                    .resolver
                    .scale_calculator()
                    .compute_for_spec(bounds.as_ref(), instance.spec());
                let floor = instance.bottom();
                instance.set_renderable(handle);
                let applied = instance.set_scale(result.scale);
                instance.rest_on(floor);
                crate::engine_debug!(LOG_SOURCE,
                    "Model for {:?} attached, scale {:.3} ({:?} accuracy)",
                    event.key, applied, result.accuracy.tier);
                Ok(())
            }
            Err(e) => Err(Self::log_and_return_error(Error::LoadFailed {
                spec_id: event.spec_id,
                reason: e.to_string(),
            })),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
