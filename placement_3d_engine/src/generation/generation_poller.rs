/// GenerationPoller - bounded, cancellable polling of remote generation tasks.
///
/// Every tracked task gets a worker thread running a fixed-interval retry
/// loop capped at `PollConfig::max_retries` polls. Updates come back to the
/// owner thread over a channel. Cancelling a task stops its loop at the
/// next wait and forgets it without reporting an error.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use rustc_hash::FxHashMap;
use crate::config::PollConfig;
use crate::error::{Error, Result};
use super::cancellation_token::CancellationToken;
use super::generation_service::{GenerationService, GenerationStatus};

const LOG_SOURCE: &str = "placement3d::GenerationPoller";

// ===== UPDATES =====

/// Progress or outcome of a tracked task
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationUpdate {
    Progress { task_id: String, progress: f32 },
    Completed { task_id: String, model_ref: String },
    Failed { task_id: String, reason: String },
    /// Retry budget spent while the task was still pending (terminal)
    TimedOut { task_id: String, attempts: u32 },
}

impl GenerationUpdate {
    pub fn task_id(&self) -> &str {
        match self {
            GenerationUpdate::Progress { task_id, .. }
            | GenerationUpdate::Completed { task_id, .. }
            | GenerationUpdate::Failed { task_id, .. }
            | GenerationUpdate::TimedOut { task_id, .. } => task_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GenerationUpdate::Progress { .. })
    }

    /// Terminal outcome as a Result (model reference on success).
    /// None for progress updates.
    pub fn into_outcome(self) -> Option<Result<String>> {
        match self {
            GenerationUpdate::Progress { .. } => None,
            GenerationUpdate::Completed { model_ref, .. } => Some(Ok(model_ref)),
            GenerationUpdate::Failed { task_id, reason } => {
                Some(Err(Error::GenerationFailed { task_id, reason }))
            }
            GenerationUpdate::TimedOut { task_id, attempts } => {
                Some(Err(Error::PollTimeout { task_id, attempts }))
            }
        }
    }
}

// ===== POLLER =====

pub struct GenerationPoller {
    service: Arc<dyn GenerationService>,
    config: PollConfig,
    sender: Sender<GenerationUpdate>,
    receiver: Receiver<GenerationUpdate>,
    /// Tracked tasks and the token that stops their loop
    tasks: FxHashMap<String, CancellationToken>,
}

impl GenerationPoller {
    pub fn new(service: Arc<dyn GenerationService>, config: PollConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            service,
            config,
            sender,
            receiver,
            tasks: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Start polling a task. Returns false if it is already tracked.
    pub fn track(&mut self, task_id: &str) -> bool {
        if self.tasks.contains_key(task_id) {
            return false;
        }

        let token = CancellationToken::new();
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        let config = self.config.clone();
        let worker_token = token.clone();
        let worker_task = task_id.to_string();

        thread::spawn(move || poll_loop(service, config, worker_task, worker_token, sender));

        self.tasks.insert(task_id.to_string(), token);
        crate::engine_info!(LOG_SOURCE, "Tracking generation task '{}'", task_id);
        true
    }

    /// Stop polling a task and forget it. Returns false if it was not tracked.
    pub fn cancel(&mut self, task_id: &str) -> bool {
        let Some(token) = self.tasks.remove(task_id) else {
            return false;
        };
        token.cancel();
        self.service.cancel(task_id);
        crate::engine_info!(LOG_SOURCE, "Cancelled generation task '{}'", task_id);
        true
    }

    /// Cancel every tracked task
    pub fn cancel_all(&mut self) {
        let ids: Vec<String> = self.tasks.keys().cloned().collect();
        for id in ids {
            self.cancel(&id);
        }
    }

    pub fn is_tracking(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    pub fn tracked_count(&self) -> usize {
        self.tasks.len()
    }

    /// Collect pending updates without blocking.
    ///
    /// Updates of cancelled tasks are discarded; terminal updates stop
    /// tracking their task.
    pub fn drain(&mut self) -> Vec<GenerationUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.receiver.try_recv() {
            if self.accept(&update) {
                updates.push(update);
            }
        }
        updates
    }

    /// Wait up to `timeout` for the next update of a tracked task
    pub fn next_update(&mut self, timeout: Duration) -> Option<GenerationUpdate> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(update) => {
                    if self.accept(&update) {
                        return Some(update);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
    }

    fn accept(&mut self, update: &GenerationUpdate) -> bool {
        if !self.tasks.contains_key(update.task_id()) {
            return false;
        }
        if update.is_terminal() {
            self.tasks.remove(update.task_id());
            match update {
                GenerationUpdate::Completed { task_id, model_ref } => crate::engine_info!(LOG_SOURCE,
                    "Task '{}' completed: {}", task_id, model_ref),
                GenerationUpdate::Failed { task_id, reason } => crate::engine_warn!(LOG_SOURCE,
                    "Task '{}' failed: {}", task_id, reason),
                GenerationUpdate::TimedOut { task_id, attempts } => crate::engine_warn!(LOG_SOURCE,
                    "Task '{}' timed out after {} polls", task_id, attempts),
                GenerationUpdate::Progress { .. } => {}
            }
        }
        true
    }
}

impl Drop for GenerationPoller {
    fn drop(&mut self) {
        for token in self.tasks.values() {
            token.cancel();
        }
    }
}

/// Worker loop: poll, then wait one interval, at most `max_retries` times
fn poll_loop(
    service: Arc<dyn GenerationService>,
    config: PollConfig,
    task_id: String,
    token: CancellationToken,
    sender: Sender<GenerationUpdate>,
) {
    for attempt in 1..=config.max_retries {
        if token.is_cancelled() {
            return;
        }

        let update = match service.poll(&task_id) {
            Ok(GenerationStatus::Completed { model_ref }) => {
                Some(GenerationUpdate::Completed { task_id: task_id.clone(), model_ref })
            }
            Ok(GenerationStatus::Failed { reason }) => {
                Some(GenerationUpdate::Failed { task_id: task_id.clone(), reason })
            }
            Ok(GenerationStatus::Pending { progress }) => {
                if let Some(progress) = progress {
                    let _ = sender.send(GenerationUpdate::Progress {
                        task_id: task_id.clone(),
                        progress: progress.clamp(0.0, 1.0),
                    });
                }
                None
            }
            Err(reason) => {
                crate::engine_debug!(LOG_SOURCE,
                    "Poll {}/{} of '{}' failed: {}", attempt, config.max_retries, task_id, reason);
                None
            }
        };

        if let Some(update) = update {
            if !token.is_cancelled() {
                let _ = sender.send(update);
            }
            return;
        }

        if attempt < config.max_retries && token.wait_timeout(config.interval()) {
            return;
        }
    }

    if !token.is_cancelled() {
        let _ = sender.send(GenerationUpdate::TimedOut {
            task_id,
            attempts: config.max_retries,
        });
    }
}

#[cfg(test)]
#[path = "generation_poller_tests.rs"]
mod tests;
