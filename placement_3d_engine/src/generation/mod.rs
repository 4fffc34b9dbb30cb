//! Generation module
//!
//! Polling of the remote 3D-generation service off the owner thread.

mod cancellation_token;
mod generation_service;
mod generation_poller;

pub use cancellation_token::CancellationToken;
pub use generation_service::{GenerationService, GenerationStatus};
pub use generation_poller::{GenerationPoller, GenerationUpdate};
