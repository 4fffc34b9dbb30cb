/// Spiral search candidates for auto-position.

use std::f32::consts::TAU;
use glam::Vec3;
use crate::config::ManipulationConfig;

/// Candidate positions around `origin`, nearest rings first.
///
/// The origin itself comes first, then `angular_steps` points on each ring
/// of radius `step`, `2 * step`, ... up to `max_radius`. The vertical
/// coordinate is kept.
pub fn spiral_candidates(origin: Vec3, config: &ManipulationConfig) -> impl Iterator<Item = Vec3> {
    let step = config.auto_position_step;
    let angular_steps = config.auto_position_angular_steps.max(1);
    let rings = if step > 0.0 {
        (config.auto_position_max_radius / step + 1e-4).floor() as u32
    } else {
        0
    };

    std::iter::once(origin).chain((1..=rings).flat_map(move |ring| {
        let radius = ring as f32 * step;
        (0..angular_steps).map(move |i| {
            let angle = TAU * i as f32 / angular_steps as f32;
            origin + Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
        })
    }))
}

#[cfg(test)]
#[path = "auto_position_tests.rs"]
mod tests;
