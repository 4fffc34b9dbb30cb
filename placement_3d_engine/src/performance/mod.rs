//! Performance module
//!
//! Frame sampling and the governor that evicts or degrades instances
//! under load.

mod frame_sampler;
mod performance_governor;

pub use frame_sampler::FrameSampler;
pub use performance_governor::{
    PerformanceGovernor, FrameSample, GovernorContext, GovernorReport,
};
