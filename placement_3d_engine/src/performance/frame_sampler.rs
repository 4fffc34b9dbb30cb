/// Rolling frame-time window used to derive a stable FPS figure.

use std::collections::VecDeque;
use std::time::Duration;

/// Ring buffer of recent frame times
#[derive(Debug, Clone)]
pub struct FrameSampler {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
}

impl FrameSampler {
    /// Window of `max_samples` frames (at least one)
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    /// Add a frame time sample
    pub fn record_frame(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    /// Average FPS over the window (0 when empty)
    pub fn average_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: Duration = self.frame_times.iter().sum();
        let average = total.as_secs_f32() / self.frame_times.len() as f32;
        if average > 0.0 { 1.0 / average } else { 0.0 }
    }

    /// Longest frame in the window
    pub fn worst_frame(&self) -> Option<Duration> {
        self.frame_times.iter().max().copied()
    }

    pub fn len(&self) -> usize {
        self.frame_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_times.is_empty()
    }

    pub fn clear(&mut self) {
        self.frame_times.clear();
    }
}

impl Default for FrameSampler {
    /// About two seconds at 60 FPS
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
#[path = "frame_sampler_tests.rs"]
mod tests;
