/// ManipulationController - selection and transform state machine.
///
/// States: Idle, Selected(key), Manipulating(key, kind). At most one
/// instance is manipulated at a time; beginning a gesture on another
/// instance force-ends the current one first.
///
/// Constraints per gesture kind:
/// - Translate: the vertical coordinate is pinned to the nearest surface
///   (plus half the object's height); a move into another instance is
///   rejected and the position kept
/// - Rotate: only the twist about the vertical axis is kept
/// - Scale: clamped to the spec's [min_scale, max_scale]; the underside
///   keeps its height
///
/// Rotation and scale never run interference checks.

use glam::{Vec3, Quat};
use crate::config::ManipulationConfig;
use crate::error::{Error, Result};
use crate::placement::{DetectedSurface, snap_surface, nearest_surface};
use crate::scene::{
    InstanceKey, InterferenceChecker, PlacementRegistry, QualityFlags, SceneRenderer,
    WorldTransform, yaw_only,
};
use super::auto_position::spiral_candidates;
use super::gesture::{GestureDelta, GestureEvent, ManipulationKind, ManipulationState};

const LOG_SOURCE: &str = "placement3d::Manipulation";

pub struct ManipulationController {
    config: ManipulationConfig,
    state: ManipulationState,
    /// Transform captured when the active manipulation began
    begin_transform: Option<WorldTransform>,
}

impl ManipulationController {
    pub fn new(config: ManipulationConfig) -> Self {
        Self {
            config,
            state: ManipulationState::Idle,
            begin_transform: None,
        }
    }

    pub fn config(&self) -> &ManipulationConfig {
        &self.config
    }

    pub fn state(&self) -> ManipulationState {
        self.state
    }

    pub fn selected(&self) -> Option<InstanceKey> {
        self.state.selected_key()
    }

    // ===== EVENT DISPATCH =====

    /// Feed one gesture event to the state machine.
    ///
    /// Returns the state after the event. A rejected move returns
    /// `InterferenceRejected` and leaves both the state and the position
    /// unchanged.
    pub fn handle(
        &mut self,
        event: GestureEvent,
        registry: &mut PlacementRegistry,
        renderer: &mut dyn SceneRenderer,
        surfaces: &[DetectedSurface],
    ) -> Result<ManipulationState> {
        match event {
            GestureEvent::Tap { target: None } => {
                self.deselect_all(registry, renderer);
            }
            GestureEvent::Tap { target: Some(key) } => {
                self.select(key, registry, renderer)?;
            }
            GestureEvent::Begin { target, kind } => {
                self.begin(target, kind, registry, renderer)?;
            }
            GestureEvent::Change(delta) => {
                self.apply(delta, registry, renderer, surfaces)?;
            }
            GestureEvent::End => self.end(registry),
            GestureEvent::Cancel => self.cancel(registry),
        }
        Ok(self.state)
    }

    // ===== SELECTION =====

    /// Toggle selection of `key`: selects it, or returns to Idle if it was
    /// already selected. An active manipulation is ended first.
    pub fn select(
        &mut self,
        key: InstanceKey,
        registry: &mut PlacementRegistry,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<ManipulationState> {
        if !registry.contains(key) {
            return Err(Error::UnknownInstance(key));
        }

        self.end(registry);
        let previous = self.selected();
        self.deselect_all(registry, renderer);

        if previous != Some(key) {
            Self::set_selected(key, true, registry, renderer);
            self.state = ManipulationState::Selected(key);
            crate::engine_trace!(LOG_SOURCE, "Selected {:?}", key);
        }
        Ok(self.state)
    }

    /// Deselect `key` if it is the selected instance
    pub fn deselect(
        &mut self,
        key: InstanceKey,
        registry: &mut PlacementRegistry,
        renderer: &mut dyn SceneRenderer,
    ) -> ManipulationState {
        if self.selected() == Some(key) {
            self.deselect_all(registry, renderer);
        }
        self.state
    }

    /// End any manipulation and clear the selection
    pub fn deselect_all(&mut self, registry: &mut PlacementRegistry, renderer: &mut dyn SceneRenderer) {
        self.end(registry);
        if let Some(key) = self.selected() {
            Self::set_selected(key, false, registry, renderer);
            crate::engine_trace!(LOG_SOURCE, "Deselected {:?}", key);
        }
        self.state = ManipulationState::Idle;
    }

    /// Drop any reference to a removed instance
    pub fn forget(&mut self, key: InstanceKey) {
        if self.selected() == Some(key) {
            self.state = ManipulationState::Idle;
            self.begin_transform = None;
        }
    }

    fn set_selected(
        key: InstanceKey,
        selected: bool,
        registry: &mut PlacementRegistry,
        renderer: &mut dyn SceneRenderer,
    ) {
        if let Some(instance) = registry.get_mut(key) {
            instance.set_selected(selected);
            let halo = selected && instance.quality_flags().contains(QualityFlags::HIGHLIGHT);
            renderer.set_highlight_visible(key, halo);
        }
    }

    // ===== MANIPULATION LIFECYCLE =====

    /// Start manipulating `key`. Any other active manipulation is ended and
    /// `key` becomes the selected instance.
    pub fn begin(
        &mut self,
        key: InstanceKey,
        kind: ManipulationKind,
        registry: &mut PlacementRegistry,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<ManipulationState> {
        let Some(transform) = registry.get(key).map(|i| *i.transform()) else {
            return Err(Error::UnknownInstance(key));
        };

        match self.state {
            ManipulationState::Manipulating { key: active, .. } if active != key => {
                crate::engine_debug!(LOG_SOURCE,
                    "Force-ending manipulation of {:?} to start {:?}", active, key);
                self.end(registry);
            }
            _ => {}
        }

        if self.selected() != Some(key) {
            self.deselect_all(registry, renderer);
            Self::set_selected(key, true, registry, renderer);
        }

        if let Some(instance) = registry.get_mut(key) {
            instance.set_manipulating(true);
        }
        self.begin_transform = Some(transform);
        self.state = ManipulationState::Manipulating { key, kind };
        crate::engine_trace!(LOG_SOURCE, "Begin {:?} on {:?}", kind, key);
        Ok(self.state)
    }

    /// Finish the active manipulation (back to Selected)
    pub fn end(&mut self, registry: &mut PlacementRegistry) {
        if let ManipulationState::Manipulating { key, kind } = self.state {
            if let Some(instance) = registry.get_mut(key) {
                instance.set_manipulating(false);
            }
            self.begin_transform = None;
            self.state = ManipulationState::Selected(key);
            crate::engine_trace!(LOG_SOURCE, "End {:?} on {:?}", kind, key);
        }
    }

    /// Abort the active manipulation, restoring the transform it started from
    pub fn cancel(&mut self, registry: &mut PlacementRegistry) {
        if let (ManipulationState::Manipulating { key, .. }, Some(transform)) =
            (self.state, self.begin_transform)
        {
            if let Some(instance) = registry.get_mut(key) {
                instance.set_transform(transform);
            }
        }
        self.end(registry);
    }

    /// Apply a gesture delta to the manipulated instance.
    ///
    /// Deltas arriving outside a manipulation, or of another kind than the
    /// active one, are ignored.
    pub fn apply(
        &mut self,
        delta: GestureDelta,
        registry: &mut PlacementRegistry,
        renderer: &dyn SceneRenderer,
        surfaces: &[DetectedSurface],
    ) -> Result<()> {
        let ManipulationState::Manipulating { key, kind } = self.state else {
            crate::engine_trace!(LOG_SOURCE, "Ignoring {:?} outside a manipulation", delta);
            return Ok(());
        };
        if delta.kind() != kind {
            crate::engine_trace!(LOG_SOURCE, "Ignoring {:?} during {:?}", delta, kind);
            return Ok(());
        }

        match delta {
            GestureDelta::Translate { position } => {
                self.apply_translation(key, position, registry, renderer, surfaces).map(|_| ())
            }
            GestureDelta::Rotate { rotation } => {
                self.apply_rotation_gesture(key, rotation, registry).map(|_| ())
            }
            GestureDelta::Scale { factor } => {
                self.apply_scale_gesture(key, factor, registry).map(|_| ())
            }
        }
    }

    // ===== CONSTRAINED TRANSFORMS =====

    /// Move `key` toward `proposed`, pinned to the nearest surface.
    ///
    /// Returns the committed position.
    ///
    /// # Errors
    ///
    /// `InterferenceRejected` if the instance would overlap another one;
    /// the position is left unchanged.
    pub fn apply_translation(
        &self,
        key: InstanceKey,
        proposed: Vec3,
        registry: &mut PlacementRegistry,
        renderer: &dyn SceneRenderer,
        surfaces: &[DetectedSurface],
    ) -> Result<Vec3> {
        let instance = registry.get(key).ok_or(Error::UnknownInstance(key))?;

        let floor = snap_surface(proposed, surfaces)
            .or_else(|| nearest_surface(proposed, surfaces))
            .map(|surface| surface.height() + instance.half_height());
        let target = Vec3::new(proposed.x, floor.unwrap_or(instance.position().y), proposed.z);

        let candidate = InterferenceChecker::bounds_at(key, instance, target, renderer);
        if let Some(blocking) = InterferenceChecker::first_blocking(key, &candidate, registry, renderer) {
            crate::engine_warn!(LOG_SOURCE,
                "Move of {:?} rejected: would overlap {:?}", key, blocking);
            return Err(Error::InterferenceRejected { moving: key, blocking });
        }

        if let Some(instance) = registry.get_mut(key) {
            instance.set_position(target);
        }
        Ok(target)
    }

    /// Rotate `key` by the vertical twist of `rotation`.
    ///
    /// Returns the new orientation, which has no X or Z component.
    pub fn apply_rotation_gesture(
        &self,
        key: InstanceKey,
        rotation: Quat,
        registry: &mut PlacementRegistry,
    ) -> Result<Quat> {
        let instance = registry.get_mut(key).ok_or(Error::UnknownInstance(key))?;
        let orientation = (yaw_only(rotation) * instance.orientation()).normalize();
        instance.set_orientation(orientation);
        Ok(instance.orientation())
    }

    /// Multiply the scale of `key` by `factor`, clamped to the spec range.
    /// The underside stays at the same height.
    ///
    /// Returns the applied scale. Non-positive or non-finite factors are
    /// ignored.
    pub fn apply_scale_gesture(
        &self,
        key: InstanceKey,
        factor: f32,
        registry: &mut PlacementRegistry,
    ) -> Result<f32> {
        let instance = registry.get_mut(key).ok_or(Error::UnknownInstance(key))?;
        if !(factor.is_finite() && factor > 0.0) {
            return Ok(instance.scale());
        }
        let floor = instance.bottom();
        let applied = instance.set_scale(instance.scale() * factor);
        instance.rest_on(floor);
        Ok(applied)
    }

    // ===== AUTO-POSITION =====

    /// Move `key` to the nearest collision-free spot on a spiral around its
    /// current position.
    ///
    /// # Errors
    ///
    /// `AutoPositionFailed` if every candidate within the configured radius
    /// interferes; the instance keeps its original position.
    pub fn auto_position(
        &self,
        key: InstanceKey,
        registry: &mut PlacementRegistry,
        renderer: &dyn SceneRenderer,
    ) -> Result<Vec3> {
        let instance = registry.get(key).ok_or(Error::UnknownInstance(key))?;
        let origin = instance.position();

        let free = spiral_candidates(origin, &self.config).find(|candidate| {
            let bounds = InterferenceChecker::bounds_at(key, instance, *candidate, renderer);
            InterferenceChecker::first_blocking(key, &bounds, registry, renderer).is_none()
        });

        match free {
            Some(position) => {
                if let Some(instance) = registry.get_mut(key) {
                    instance.set_position(position);
                }
                crate::engine_info!(LOG_SOURCE,
                    "Auto-positioned {:?} {:.2} m away", key, position.distance(origin));
                Ok(position)
            }
            None => {
                let radius = self.config.auto_position_max_radius;
                crate::engine_warn!(LOG_SOURCE,
                    "Auto-position of {:?} failed within {:.2} m", key, radius);
                Err(Error::AutoPositionFailed { radius })
            }
        }
    }
}

impl Default for ManipulationController {
    fn default() -> Self {
        Self::new(ManipulationConfig::default())
    }
}

#[cfg(test)]
#[path = "manipulation_controller_tests.rs"]
mod tests;
