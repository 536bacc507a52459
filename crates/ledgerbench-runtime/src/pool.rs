use std::sync::Arc;

use ledgerbench_core::Session;
use tokio::task::JoinSet;
use tracing::error;

use crate::{JobQueue, ResultAggregator, Worker};

/// Fixed number of workers sharing one session, queue and aggregator.
#[derive(Clone, Copy, Debug)]
pub struct WorkerPool {
    size: usize,
}

/// What the pool did once every worker has exited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolSummary {
    pub workers: usize,
    pub handled: u64,
    /// Workers whose task panicked or was cancelled.
    pub lost_workers: usize,
}

impl WorkerPool {
    /// A pool of `size` workers. At least one worker always runs so a
    /// non-empty queue gets drained.
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Spawns the workers and returns without waiting for them.
    pub fn start<S: Session>(
        &self,
        session: Arc<S>,
        queue: Arc<JobQueue>,
        aggregator: Arc<ResultAggregator>,
    ) -> RunningPool {
        let mut workers = JoinSet::new();
        for id in 0..self.size {
            let worker = Worker {
                id,
                queue: queue.clone(),
                session: session.clone(),
                aggregator: aggregator.clone(),
            };
            workers.spawn(worker.run());
        }
        RunningPool {
            workers,
            size: self.size,
        }
    }

    /// Runs the workers until the queue is closed and drained.
    pub async fn run<S: Session>(
        &self,
        session: Arc<S>,
        queue: Arc<JobQueue>,
        aggregator: Arc<ResultAggregator>,
    ) -> PoolSummary {
        self.start(session, queue, aggregator).wait().await
    }
}

pub struct RunningPool {
    workers: JoinSet<u64>,
    size: usize,
}

impl RunningPool {
    /// Waits for every worker to exit.
    pub async fn wait(mut self) -> PoolSummary {
        let mut summary = PoolSummary {
            workers: self.size,
            ..PoolSummary::default()
        };

        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok(handled) => summary.handled += handled,
                Err(e) => {
                    error!(error = %e, "worker task exited abnormally");
                    summary.lost_workers += 1;
                }
            }
        }
        summary
    }
}
