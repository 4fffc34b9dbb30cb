/// Abstract gesture events and the manipulation state.
///
/// The engine does not know how input is delivered; the presentation layer
/// translates taps, pans, pinches and twists into these events.

use glam::{Vec3, Quat};
use crate::scene::InstanceKey;

/// Kind of an active manipulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManipulationKind {
    Translate,
    Rotate,
    Scale,
}

/// Raw delta carried by a gesture change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureDelta {
    /// Proposed world position (the vertical coordinate is overridden)
    Translate { position: Vec3 },
    /// Incremental rotation (only the vertical twist is kept)
    Rotate { rotation: Quat },
    /// Multiplicative scale change (result is clamped to the spec range)
    Scale { factor: f32 },
}

impl GestureDelta {
    pub fn kind(&self) -> ManipulationKind {
        match self {
            GestureDelta::Translate { .. } => ManipulationKind::Translate,
            GestureDelta::Rotate { .. } => ManipulationKind::Rotate,
            GestureDelta::Scale { .. } => ManipulationKind::Scale,
        }
    }
}

/// Input to the manipulation state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Tap on an instance, or on empty space (`None`)
    Tap { target: Option<InstanceKey> },
    /// A transform gesture starts on `target`
    Begin { target: InstanceKey, kind: ManipulationKind },
    /// The active gesture moved
    Change(GestureDelta),
    /// The active gesture finished
    End,
    /// The active gesture was interrupted; the transform is restored
    Cancel,
}

/// Selection / manipulation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManipulationState {
    #[default]
    Idle,
    Selected(InstanceKey),
    Manipulating { key: InstanceKey, kind: ManipulationKind },
}

impl ManipulationState {
    /// Instance that is selected (manipulated instances are selected too)
    pub fn selected_key(&self) -> Option<InstanceKey> {
        match self {
            ManipulationState::Idle => None,
            ManipulationState::Selected(key) => Some(*key),
            ManipulationState::Manipulating { key, .. } => Some(*key),
        }
    }

    pub fn is_manipulating(&self) -> bool {
        matches!(self, ManipulationState::Manipulating { .. })
    }
}
