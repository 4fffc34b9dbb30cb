/// Asynchronous model loading.
///
/// Each request runs `AssetRepository::load_model` on a worker thread and
/// sends the result back over a channel. The owner thread collects
/// finished loads with `drain()` before touching the registry.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use rustc_hash::FxHashMap;
use crate::scene::InstanceKey;
use super::asset_repository::{AssetRepository, LoadError, RenderableHandle};

const LOG_SOURCE: &str = "placement3d::AssetLoader";

/// A finished load
#[derive(Debug, Clone)]
pub struct AssetLoadEvent {
    pub key: InstanceKey,
    pub spec_id: String,
    pub result: Result<RenderableHandle, LoadError>,
}

pub struct AssetLoader {
    repository: Arc<dyn AssetRepository>,
    sender: Sender<AssetLoadEvent>,
    receiver: Receiver<AssetLoadEvent>,
    /// In-flight loads per instance
    pending: FxHashMap<InstanceKey, JoinHandle<()>>,
}

impl AssetLoader {
    pub fn new(repository: Arc<dyn AssetRepository>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            repository,
            sender,
            receiver,
            pending: FxHashMap::default(),
        }
    }

    pub fn repository(&self) -> &Arc<dyn AssetRepository> {
        &self.repository
    }

    /// Start loading the model of `spec_id` for instance `key`.
    ///
    /// Returns false if a load for this instance is already in flight.
    pub fn request(&mut self, key: InstanceKey, spec_id: &str) -> bool {
        if self.pending.contains_key(&key) {
            return false;
        }

        let repository = Arc::clone(&self.repository);
        let sender = self.sender.clone();
        let spec_id = spec_id.to_string();

        crate::engine_debug!(LOG_SOURCE, "Loading '{}' for {:?}", spec_id, key);
        let worker = thread::spawn(move || {
            let result = repository.load_model(&spec_id);
            // The loader may have been dropped meanwhile
            let _ = sender.send(AssetLoadEvent { key, spec_id, result });
        });
        self.pending.insert(key, worker);
        true
    }

    /// Collect every finished load without blocking
    pub fn drain(&mut self) -> Vec<AssetLoadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            self.finish(&event);
            events.push(event);
        }
        events
    }

    /// Wait up to `timeout` for the next finished load
    pub fn next_event(&mut self, timeout: Duration) -> Option<AssetLoadEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.finish(&event);
                Some(event)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn is_pending(&self, key: InstanceKey) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn finish(&mut self, event: &AssetLoadEvent) {
        if let Some(worker) = self.pending.remove(&event.key) {
            // The worker has already sent its result
            if worker.join().is_err() {
                crate::engine_error!(LOG_SOURCE, "Loader thread for '{}' panicked", event.spec_id);
            }
        }
        match &event.result {
            Ok(handle) => crate::engine_debug!(LOG_SOURCE,
                "Loaded '{}' for {:?} (handle {})", event.spec_id, event.key, handle.id()),
            Err(e) => crate::engine_warn!(LOG_SOURCE,
                "Load of '{}' for {:?} failed: {}", event.spec_id, event.key, e),
        }
    }
}

#[cfg(test)]
#[path = "asset_loader_tests.rs"]
mod tests;
