use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;

use crate::Job;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("job queue is closed")]
    Closed,
    #[error("job queue is full ({capacity} jobs)")]
    Full { capacity: usize },
}

/// Bounded, closable multi-consumer queue of [`Job`]s.
///
/// Each enqueued job is handed to exactly one consumer. Consumers see FIFO
/// order; across consumers there is no ordering.
pub struct JobQueue {
    tx: Mutex<Option<mpsc::Sender<Job>>>,
    // Consumers take turns on the receiver; whoever holds the lock waits for
    // the next job.
    rx: tokio::sync::Mutex<mpsc::Receiver<Job>>,
    capacity: usize,
}

impl JobQueue {
    /// A queue holding up to `capacity` jobs. Sized to the batch, so the
    /// producer never waits.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx: Mutex::new(Some(tx)),
            rx: tokio::sync::Mutex::new(rx),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn enqueue(&self, job: Job) -> Result<(), QueueError> {
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(QueueError::Closed)?;
        tx.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full {
                capacity: self.capacity,
            },
            TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    /// Stops accepting jobs. Jobs already queued remain available to
    /// consumers. Returns `false` if the queue was already closed.
    pub fn close(&self) -> bool {
        self.tx.lock().take().is_some()
    }

    /// Next job, waiting while the queue is empty and open. `None` once the
    /// queue is closed and drained.
    pub async fn dequeue(&self) -> Option<Job> {
        self.rx.lock().await.recv().await
    }
}
