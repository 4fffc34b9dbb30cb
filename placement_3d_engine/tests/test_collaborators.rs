#![allow(dead_code)]
//! Shared collaborators for integration tests
//!
//! In-process stand-ins for the tracking system, the scene renderer, the
//! asset repository and the remote generation service. State is kept
//! behind `Arc<Mutex<..>>` so a test can keep inspecting a collaborator
//! after handing it to the engine.

use placement_3d_engine::glam::{Vec2, Vec3};
use placement_3d_engine::placement3d::assets::{AssetRepository, LoadError, RenderableHandle};
use placement_3d_engine::placement3d::generation::{GenerationService, GenerationStatus};
use placement_3d_engine::placement3d::placement::{
    DetectedSurface, RaycastMode, SurfaceAlignment, TrackingProvider, WorldHit,
};
use placement_3d_engine::placement3d::scene::{AABB, DetailLevel, InstanceKey, SceneRenderer};
use placement_3d_engine::placement3d::log::{LogEntry, Logger};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// TRACKING
// ============================================================================

/// Single 10 m x 10 m floor; ray-casts hit the point set with `aim`
#[derive(Clone)]
pub struct FloorTracking {
    target: Arc<Mutex<Option<Vec3>>>,
    pub camera: Vec3,
}

impl FloorTracking {
    pub fn new() -> Self {
        Self {
            target: Arc::new(Mutex::new(Some(Vec3::ZERO))),
            camera: Vec3::new(0.0, 1.6, 4.0),
        }
    }

    /// Aim subsequent ray-casts at `point` (None = nothing under the pointer)
    pub fn aim(&self, point: Option<Vec3>) {
        *self.target.lock().unwrap() = point;
    }
}

impl TrackingProvider for FloorTracking {
    fn detected_surfaces(&self) -> Vec<DetectedSurface> {
        vec![DetectedSurface::horizontal(1, Vec3::ZERO, 10.0, 10.0)]
    }

    fn raycast(&self, _screen_point: Vec2, mode: RaycastMode, _alignment: SurfaceAlignment) -> Option<WorldHit> {
        match mode {
            RaycastMode::ExactSurface => self.target.lock().unwrap().map(WorldHit::new),
            RaycastMode::EstimatedSurface => None,
        }
    }

    fn camera_position(&self) -> Vec3 {
        self.camera
    }
}

// ============================================================================
// RENDERER
// ============================================================================

/// What the engine asked the renderer to show
#[derive(Default)]
pub struct RenderState {
    pub detail: HashMap<InstanceKey, DetailLevel>,
    pub shadows: HashMap<InstanceKey, bool>,
    pub highlights: HashMap<InstanceKey, bool>,
}

/// Renderer without measured bounds that records every quality request
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub state: Arc<Mutex<RenderState>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shadow(&self, key: InstanceKey) -> Option<bool> {
        self.state.lock().unwrap().shadows.get(&key).copied()
    }

    pub fn highlight(&self, key: InstanceKey) -> Option<bool> {
        self.state.lock().unwrap().highlights.get(&key).copied()
    }

    pub fn detail(&self, key: InstanceKey) -> Option<DetailLevel> {
        self.state.lock().unwrap().detail.get(&key).copied()
    }
}

impl SceneRenderer for RecordingRenderer {
    fn world_bounds(&self, _key: InstanceKey) -> Option<AABB> {
        None
    }

    fn set_detail_level(&mut self, key: InstanceKey, level: DetailLevel) {
        self.state.lock().unwrap().detail.insert(key, level);
    }

    fn set_shadow_visible(&mut self, key: InstanceKey, visible: bool) {
        self.state.lock().unwrap().shadows.insert(key, visible);
    }

    fn set_highlight_visible(&mut self, key: InstanceKey, visible: bool) {
        self.state.lock().unwrap().highlights.insert(key, visible);
    }
}

// ============================================================================
// ASSET REPOSITORY
// ============================================================================

/// Repository serving fixed model bounds per spec id
#[derive(Default)]
pub struct InMemoryRepository {
    models: HashMap<String, AABB>,
    pub evictions: Mutex<u32>,
}

impl InMemoryRepository {
    pub fn with_model(mut self, spec_id: &str, bounds: AABB) -> Self {
        self.models.insert(spec_id.to_string(), bounds);
        self
    }

    pub fn eviction_count(&self) -> u32 {
        *self.evictions.lock().unwrap()
    }
}

impl AssetRepository for InMemoryRepository {
    fn load_model(&self, spec_id: &str) -> Result<RenderableHandle, LoadError> {
        self.models
            .get(spec_id)
            .map(|bounds| RenderableHandle::new(spec_id.len() as u64, Some(*bounds)))
            .ok_or_else(|| LoadError::NotFound(spec_id.to_string()))
    }

    fn evict_least_recently_used(&self) {
        *self.evictions.lock().unwrap() += 1;
    }
}

// ============================================================================
// GENERATION SERVICE
// ============================================================================

/// Service whose tasks stay pending for a fixed number of polls, then
/// complete (or fail when the id starts with "fail")
pub struct CountdownService {
    pending_polls: u32,
    polls: Mutex<HashMap<String, u32>>,
    pub cancelled: Mutex<Vec<String>>,
}

impl CountdownService {
    pub fn new(pending_polls: u32) -> Self {
        Self {
            pending_polls,
            polls: Mutex::new(HashMap::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    pub fn poll_count(&self, task_id: &str) -> u32 {
        self.polls.lock().unwrap().get(task_id).copied().unwrap_or(0)
    }
}

impl GenerationService for CountdownService {
    fn poll(&self, task_id: &str) -> Result<GenerationStatus, String> {
        let mut polls = self.polls.lock().unwrap();
        let count = polls.entry(task_id.to_string()).or_insert(0);
        *count += 1;
        if *count <= self.pending_polls {
            return Ok(GenerationStatus::Pending {
                progress: Some(*count as f32 / (self.pending_polls + 1) as f32),
            });
        }
        if task_id.starts_with("fail") {
            Ok(GenerationStatus::Failed { reason: "mesh reconstruction failed".to_string() })
        } else {
            Ok(GenerationStatus::Completed { model_ref: format!("models/{}.glb", task_id) })
        }
    }

    fn cancel(&self, task_id: &str) {
        self.cancelled.lock().unwrap().push(task_id.to_string());
    }
}

// ============================================================================
// LOGGER
// ============================================================================

/// Logger that keeps every entry for later inspection
pub struct CaptureLogger {
    pub entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    pub fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}
