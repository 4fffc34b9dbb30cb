/// Placed furniture instances.
///
/// A PlacedInstance is a plain data record: a shared reference to its
/// immutable FurnitureSpec plus the mutable state of one object in the
/// room (transform, selection, render quality). It is created by the
/// placement resolver, mutated by the manipulation controller and the
/// performance governor, and owned by the PlacementRegistry.

use std::sync::Arc;
use bitflags::bitflags;
use glam::{Vec3, Quat, Mat4, EulerRot};
use slotmap::new_key_type;
use crate::assets::RenderableHandle;
use crate::catalog::FurnitureSpec;
use super::aabb::AABB;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a PlacedInstance within a PlacementRegistry.
    ///
    /// Keys remain valid even after other instances are removed.
    /// A key becomes invalid only when its own instance is removed.
    pub struct InstanceKey;
}

// ===== WORLD TRANSFORM =====

/// Rotation about the vertical axis only.
///
/// Keeps the Y twist of `rotation` and discards every other axis
/// contribution. A rotation with no Y twist at all (e.g. a pure half
/// turn about X) yields identity.
pub fn yaw_only(rotation: Quat) -> Quat {
    let twist = Quat::from_xyzw(0.0, rotation.y, 0.0, rotation.w);
    let length = twist.length();
    if length < 1e-6 {
        Quat::IDENTITY
    } else {
        twist / length
    }
}

/// World transform of a placed instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    /// Center of the object's bounding box, in meters
    pub position: Vec3,
    /// Rotation about the vertical axis
    pub orientation: Quat,
    /// Uniform render scale
    pub scale: f32,
}

impl WorldTransform {
    pub fn new(position: Vec3, orientation: Quat, scale: f32) -> Self {
        Self { position, orientation, scale }
    }

    /// Transform at `position` with no rotation and unit scale
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY, 1.0)
    }

    /// Rotation angle about Y, in radians
    pub fn yaw(&self) -> f32 {
        self.orientation.to_euler(EulerRot::YXZ).0
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orientation, self.position)
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

// ===== RENDER QUALITY =====

/// Detail level requested from the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DetailLevel {
    #[default]
    Full,
    /// Cheaper representation used under memory pressure
    Reduced,
}

bitflags! {
    /// Secondary rendering effects enabled on an instance
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QualityFlags: u32 {
        /// Instance casts a shadow
        const SHADOWS   = 1 << 0;
        /// Selection highlight halo is allowed
        const HIGHLIGHT = 1 << 1;
    }
}

impl Default for QualityFlags {
    fn default() -> Self {
        QualityFlags::all()
    }
}

// ===== PLACED INSTANCE =====

/// One placed object
#[derive(Debug, Clone)]
pub struct PlacedInstance {
    spec: Arc<FurnitureSpec>,
    transform: WorldTransform,
    /// Local bounds in model units, centered on the origin; the world size
    /// is `local_bounds.size() * scale`
    local_bounds: AABB,
    selected: bool,
    manipulating: bool,
    /// Assigned by the registry on insertion
    sequence: u64,
    detail_level: DetailLevel,
    quality: QualityFlags,
    renderable: Option<RenderableHandle>,
}

impl PlacedInstance {
    /// Create an instance of `spec`.
    ///
    /// The scale is clamped into the spec's range and the orientation is
    /// reduced to its yaw. Until a model is loaded, the local bounds are the
    /// spec's real size at its default scale.
    pub fn new(spec: Arc<FurnitureSpec>, transform: WorldTransform) -> Self {
        let half = spec.real_size().to_vec3() * 0.5 / spec.default_scale();
        let transform = WorldTransform {
            position: transform.position,
            orientation: yaw_only(transform.orientation),
            scale: spec.clamp_scale(transform.scale),
        };
        Self {
            spec,
            transform,
            local_bounds: AABB::from_center_half_extents(Vec3::ZERO, half),
            selected: false,
            manipulating: false,
            sequence: 0,
            detail_level: DetailLevel::Full,
            quality: QualityFlags::default(),
            renderable: None,
        }
    }

    /// Use the model's own bounds as local bounds instead of the spec's
    /// real size. Invalid bounds are ignored.
    pub fn with_model_bounds(mut self, bounds: &AABB) -> Self {
        self.set_local_bounds(bounds);
        self
    }

    // ===== ACCESSORS =====

    pub fn spec(&self) -> &Arc<FurnitureSpec> {
        &self.spec
    }

    pub fn transform(&self) -> &WorldTransform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn orientation(&self) -> Quat {
        self.transform.orientation
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn local_bounds(&self) -> &AABB {
        &self.local_bounds
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_manipulating(&self) -> bool {
        self.manipulating
    }

    /// Insertion sequence number (smaller is older)
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn detail_level(&self) -> DetailLevel {
        self.detail_level
    }

    pub fn quality_flags(&self) -> QualityFlags {
        self.quality
    }

    pub fn renderable(&self) -> Option<&RenderableHandle> {
        self.renderable.as_ref()
    }

    /// World matrix (scale, yaw, translation)
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// World bounds estimated from the local bounds and the transform.
    ///
    /// Used when the renderer cannot report measured bounds.
    pub fn estimated_world_bounds(&self) -> AABB {
        self.local_bounds.transformed(&self.world_matrix())
    }

    /// Half of the rendered height, in meters
    pub fn half_height(&self) -> f32 {
        self.local_bounds.size().y * self.transform.scale * 0.5
    }

    /// Height of the underside of the object
    pub fn bottom(&self) -> f32 {
        self.transform.position.y - self.half_height()
    }

    // ===== MUTATORS (crate-internal) =====

    pub(crate) fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Set the orientation; only the Y twist is kept
    pub(crate) fn set_orientation(&mut self, orientation: Quat) {
        self.transform.orientation = yaw_only(orientation);
    }

    /// Set the scale, clamped into the spec's range. Returns the applied scale.
    pub(crate) fn set_scale(&mut self, scale: f32) -> f32 {
        self.transform.scale = self.spec.clamp_scale(scale);
        self.transform.scale
    }

    /// Move vertically so the underside sits at `floor`
    pub(crate) fn rest_on(&mut self, floor: f32) {
        self.transform.position.y = floor + self.half_height();
    }

    pub(crate) fn set_transform(&mut self, transform: WorldTransform) {
        self.set_position(transform.position);
        self.set_orientation(transform.orientation);
        self.set_scale(transform.scale);
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_manipulating(&mut self, manipulating: bool) {
        self.manipulating = manipulating;
    }

    pub(crate) fn set_detail_level(&mut self, level: DetailLevel) {
        self.detail_level = level;
    }

    pub(crate) fn set_quality_flags(&mut self, flags: QualityFlags) {
        self.quality = flags;
    }

    /// Attach a loaded model. Its bounds, when valid, become the local bounds.
    pub(crate) fn set_renderable(&mut self, handle: RenderableHandle) {
        if let Some(bounds) = handle.model_bounds() {
            self.set_local_bounds(&bounds);
        }
        self.renderable = Some(handle);
    }

    fn set_local_bounds(&mut self, bounds: &AABB) {
        if bounds.is_valid() {
            self.local_bounds = AABB::from_center_half_extents(Vec3::ZERO, bounds.half_extents());
        }
    }
}

#[cfg(test)]
#[path = "placed_instance_tests.rs"]
mod tests;
