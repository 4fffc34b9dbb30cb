//! Manipulation module
//!
//! Gesture events, the selection/manipulation state machine and the
//! auto-position search.

mod gesture;
mod auto_position;
mod manipulation_controller;

pub use gesture::{GestureEvent, GestureDelta, ManipulationKind, ManipulationState};
pub use auto_position::spiral_candidates;
pub use manipulation_controller::ManipulationController;
