/// Remote 3D-generation service collaborator.
///
/// The wire protocol is not the engine's concern: a task is polled by id
/// until it reports a terminal status.

/// Status reported by one poll
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStatus {
    /// Still running; progress in [0, 1] when the service reports it
    Pending { progress: Option<f32> },
    /// Finished; `model_ref` locates the generated model
    Completed { model_ref: String },
    /// The service gave up on the task
    Failed { reason: String },
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GenerationStatus::Pending { .. })
    }
}

/// Remote generation service. Polled from worker threads.
pub trait GenerationService: Send + Sync {
    /// Query a task once. `Err` is a transient transport failure and counts
    /// as a spent attempt.
    fn poll(&self, task_id: &str) -> Result<GenerationStatus, String>;

    /// Tell the service the task is no longer wanted
    fn cancel(&self, _task_id: &str) {}
}
