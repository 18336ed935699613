use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Requests cooperative termination of one run.
///
/// Clones share the same flag and may be moved to other threads. The running
/// program observes the request before its next operation.
#[derive(Debug, Clone, Default)]
pub struct Canceller {
    cancelled: Arc<AtomicBool>,
}

impl Canceller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent. Has no effect once the run has finished.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn cancel_is_shared_between_clones_and_threads() {
        let canceller = Canceller::new();
        let remote = canceller.clone();
        assert!(!canceller.is_cancelled());
        thread::spawn(move || {
            remote.cancel();
            remote.cancel();
        })
        .join()
        .expect("cancelling thread panicked");
        assert!(canceller.is_cancelled());
    }

    #[test]
    fn separate_cancellers_are_independent() {
        let first = Canceller::new();
        let second = Canceller::new();
        first.cancel();
        assert!(!second.is_cancelled());
    }
}
