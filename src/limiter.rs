// Hash concurrency limiter
// One limiter is shared across the whole recursive traversal so that
// subtree fan-out cannot create unbounded subprocess or fd pressure.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

/// Bounds the number of hash computations in flight process-wide.
///
/// Cheap to clone; clones share the same permit pool. Queued waiters are
/// released in arrival order (tokio semaphores are FIFO-fair), and a failing
/// task releases its permit exactly like a succeeding one.
///
/// Reconfiguring the limit means constructing a new `HashLimiter`; tasks
/// already running against the old one complete under the old bound.
#[derive(Clone)]
pub struct HashLimiter {
    permits: Arc<Semaphore>,
}

impl HashLimiter {
    /// Create a limiter allowing at most `max` concurrent tasks. A limit of
    /// zero is clamped to one so work can always make progress.
    pub fn new(max: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max.max(1))),
        }
    }

    /// Run `task` once a slot is free, holding the slot until it completes.
    pub async fn run<F, T>(&self, task: F) -> T
    where
        F: Future<Output = T>,
    {
        // The semaphore is never closed, so acquire cannot fail.
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("hash limiter semaphore closed");
        task.await
    }
}
