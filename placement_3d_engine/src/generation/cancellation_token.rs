/// Cancellation token shared between the owner thread and a worker.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Cloneable cancellation flag with an interruptible wait
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and wake every waiter
    pub fn cancel(&self) {
        let (flag, signal) = &*self.inner;
        if let Ok(mut cancelled) = flag.lock() {
            *cancelled = true;
        }
        signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        flag.lock().map(|cancelled| *cancelled).unwrap_or(true)
    }

    /// Sleep for `timeout` unless cancelled first.
    ///
    /// Returns true if the token is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, signal) = &*self.inner;
        let Ok(guard) = flag.lock() else {
            return true;
        };
        match signal.wait_timeout_while(guard, timeout, |cancelled| !*cancelled) {
            Ok((cancelled, _)) => *cancelled,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
#[path = "cancellation_token_tests.rs"]
mod tests;
