/// PerformanceGovernor - eviction and quality degradation under load.
///
/// Each tick evaluates one frame sample:
/// - more instances than `max_instances`: the oldest excess is evicted
/// - memory above threshold: the asset cache is asked to shrink and
///   instances far from the camera switch to reduced detail
/// - frame rate below threshold: shadows and highlight halos are turned
///   off everywhere and detail upgrades are suspended
///
/// Degradation is level-triggered: it is reapplied on every unhealthy tick.
/// Quality is restored only after the metrics have stayed healthy for a
/// whole recovery interval.

use std::time::Duration;
use glam::Vec3;
use crate::assets::AssetRepository;
use crate::config::GovernorConfig;
use crate::scene::{DetailLevel, InstanceKey, PlacementRegistry, QualityFlags, SceneRenderer};

const LOG_SOURCE: &str = "placement3d::Governor";

/// One sample of the frame loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub fps: f32,
    pub memory_mb: f32,
    pub instance_count: usize,
    /// Time since the previous sample
    pub elapsed: Duration,
}

/// Collaborators the governor acts on during a tick
pub struct GovernorContext<'a> {
    pub registry: &'a mut PlacementRegistry,
    pub renderer: &'a mut dyn SceneRenderer,
    pub assets: Option<&'a dyn AssetRepository>,
    pub camera_position: Vec3,
}

/// What a tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GovernorReport {
    /// Instances evicted for capacity, oldest first
    pub evicted: Vec<InstanceKey>,
    pub memory_pressure: bool,
    pub low_fps: bool,
    /// Instances switched to reduced detail during this tick
    pub reduced_detail: Vec<InstanceKey>,
    /// Full quality was restored during this tick
    pub restored: bool,
}

impl GovernorReport {
    pub fn is_healthy(&self) -> bool {
        !self.memory_pressure && !self.low_fps
    }
}

pub struct PerformanceGovernor {
    config: GovernorConfig,
    /// Some degradation is currently in effect
    degraded: bool,
    /// Continuous healthy time since the last unhealthy sample
    healthy_for: Duration,
}

impl PerformanceGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            config,
            degraded: false,
            healthy_for: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Evaluate one sample and act on the registry and renderer
    pub fn tick(&mut self, sample: FrameSample, ctx: &mut GovernorContext<'_>) -> GovernorReport {
        let mut report = GovernorReport::default();

        // Hard capacity
        if sample.instance_count > self.config.max_instances {
            let excess = sample.instance_count - self.config.max_instances;
            report.evicted = ctx
                .registry
                .evict_oldest(excess)
                .into_iter()
                .map(|(key, _)| key)
                .collect();
            crate::engine_warn!(LOG_SOURCE,
                "{} instances over the limit of {}, evicted {}",
                sample.instance_count, self.config.max_instances, report.evicted.len());
        }

        report.memory_pressure = sample.memory_mb > self.config.memory_threshold_mb;
        report.low_fps = sample.fps < self.config.fps_threshold;

        if report.memory_pressure {
            report.reduced_detail = self.relieve_memory(sample.memory_mb, ctx);
        }
        if report.low_fps {
            self.disable_effects(sample.fps, ctx);
        }

        if report.is_healthy() {
            self.healthy_for += sample.elapsed;
            if self.degraded && self.healthy_for >= self.config.recovery_interval() {
                self.restore(ctx);
                report.restored = true;
            }
        } else {
            self.healthy_for = Duration::ZERO;
            self.degraded = true;
        }

        report
    }

    /// Shrink the asset cache and reduce detail beyond the distance threshold
    fn relieve_memory(&self, memory_mb: f32, ctx: &mut GovernorContext<'_>) -> Vec<InstanceKey> {
        if let Some(assets) = ctx.assets {
            assets.evict_least_recently_used();
        }

        let far: Vec<InstanceKey> = ctx
            .registry
            .all()
            .filter(|(_, instance)| {
                instance.detail_level() == DetailLevel::Full
                    && instance.position().distance(ctx.camera_position) > self.config.reduced_detail_distance
            })
            .map(|(key, _)| key)
            .collect();

        for &key in &far {
            if let Some(instance) = ctx.registry.get_mut(key) {
                instance.set_detail_level(DetailLevel::Reduced);
            }
            ctx.renderer.set_detail_level(key, DetailLevel::Reduced);
        }

        if !far.is_empty() {
            crate::engine_info!(LOG_SOURCE,
                "Memory at {:.0} MB (limit {:.0}): reduced detail on {} instances",
                memory_mb, self.config.memory_threshold_mb, far.len());
        }
        far
    }

    /// Turn off shadows and highlight halos on every instance
    fn disable_effects(&self, fps: f32, ctx: &mut GovernorContext<'_>) {
        let keys: Vec<InstanceKey> = ctx.registry.keys().collect();
        let mut changed = 0;
        for key in keys {
            if let Some(instance) = ctx.registry.get_mut(key) {
                if !instance.quality_flags().is_empty() {
                    changed += 1;
                }
                instance.set_quality_flags(QualityFlags::empty());
            }
            ctx.renderer.set_shadow_visible(key, false);
            ctx.renderer.set_highlight_visible(key, false);
        }
        if changed > 0 {
            crate::engine_info!(LOG_SOURCE,
                "{:.1} FPS (limit {:.1}): effects disabled on {} instances",
                fps, self.config.fps_threshold, changed);
        }
    }

    /// Restore full detail and effects on every instance
    fn restore(&mut self, ctx: &mut GovernorContext<'_>) {
        let keys: Vec<InstanceKey> = ctx.registry.keys().collect();
        for key in keys {
            if let Some(instance) = ctx.registry.get_mut(key) {
                instance.set_detail_level(DetailLevel::Full);
                instance.set_quality_flags(QualityFlags::all());
                let halo = instance.is_selected();
                ctx.renderer.set_detail_level(key, DetailLevel::Full);
                ctx.renderer.set_shadow_visible(key, true);
                ctx.renderer.set_highlight_visible(key, halo);
            }
        }
        self.degraded = false;
        crate::engine_info!(LOG_SOURCE,
            "Metrics healthy for {:.1} s, full quality restored", self.healthy_for.as_secs_f32());
    }
}

impl Default for PerformanceGovernor {
    fn default() -> Self {
        Self::new(GovernorConfig::default())
    }
}

#[cfg(test)]
#[path = "performance_governor_tests.rs"]
mod tests;
