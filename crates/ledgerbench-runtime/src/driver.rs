use std::sync::Arc;
use std::time::{Duration, Instant};

use ledgerbench_core::{ConnectError, ConnectOptions, Gateway, Session};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    write_report, Counters, JobQueue, JobTemplate, QueueError, ReportError, ReportTarget,
    ResultAggregator, WorkerPool,
};

/// Lifecycle of one batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Connecting,
    /// Connected; the queue is being filled.
    Running,
    /// Queue closed; workers are draining it.
    Draining,
    /// Terminal. Carries the fatal error, if any.
    Closed { error: Option<String> },
}

/// A fixed-size batch: what to send, how much, and how wide.
#[derive(Clone, Debug)]
pub struct BatchPlan {
    pub template: JobTemplate,
    pub total_jobs: u64,
    pub workers: usize,
    pub report: Option<ReportTarget>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchResult {
    pub total_jobs: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub success_count: u64,
    pub failure_count: u64,
    /// Jobs per second over the whole batch. Zero when no time elapsed.
    pub throughput: f64,
}

impl BatchResult {
    pub fn new(total_jobs: u64, duration: Duration, counters: Counters) -> Self {
        let secs = duration.as_secs_f64();
        let throughput = if secs > 0.0 {
            total_jobs as f64 / secs
        } else {
            0.0
        };
        Self {
            total_jobs,
            duration,
            success_count: counters.success,
            failure_count: counters.failure,
            throughput,
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Errors that end a batch. Per-job failures never surface here.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to connect to the {gateway} gateway")]
    Connect {
        gateway: &'static str,
        #[source]
        source: ConnectError,
    },

    #[error("failed to enqueue job {id}")]
    Queue {
        id: u64,
        #[source]
        source: QueueError,
    },

    /// The batch ran to completion; only the report is missing.
    #[error("batch finished but its report could not be written")]
    Report {
        result: BatchResult,
        #[source]
        source: ReportError,
    },
}

/// Runs one batch against a gateway: connect once, enqueue every job, drain
/// with a worker pool, close, report.
pub struct BatchDriver<G: Gateway> {
    gateway: G,
    plan: BatchPlan,
    state: DriverState,
}

impl<G: Gateway> BatchDriver<G> {
    pub fn new(gateway: G, plan: BatchPlan) -> Self {
        Self {
            gateway,
            plan,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub async fn run(&mut self, options: ConnectOptions) -> Result<BatchResult, BatchError> {
        self.transition(DriverState::Connecting);
        let session = match self.gateway.connect(options).await {
            Ok(session) => Arc::new(session),
            Err(source) => {
                self.transition(DriverState::Closed {
                    error: Some(source.to_string()),
                });
                return Err(BatchError::Connect {
                    gateway: self.gateway.name(),
                    source,
                });
            }
        };
        self.transition(DriverState::Running);

        let total = self.plan.total_jobs;
        let queue = Arc::new(JobQueue::with_capacity(
            usize::try_from(total).unwrap_or(usize::MAX),
        ));
        let template = self.plan.template.clone();
        for job in template.jobs(total) {
            let id = job.id;
            if let Err(source) = queue.enqueue(job) {
                session.close().await;
                self.transition(DriverState::Closed {
                    error: Some(source.to_string()),
                });
                return Err(BatchError::Queue { id, source });
            }
        }
        queue.close();
        self.transition(DriverState::Draining);

        let aggregator = Arc::new(ResultAggregator::new());
        let pool = WorkerPool::new(self.plan.workers);
        info!(
            total_jobs = total,
            workers = pool.size(),
            transaction = %template.transaction,
            kind = %template.kind,
            "starting batch"
        );
        let running = pool.start(session.clone(), queue, aggregator.clone());
        let started = Instant::now();
        let summary = running.wait().await;
        let duration = started.elapsed();

        let mut counters = aggregator.snapshot();
        if counters.total() < total {
            // Jobs a lost worker took or left queued never got an outcome.
            let unaccounted = total - counters.total();
            warn!(
                lost_workers = summary.lost_workers,
                unaccounted, "counting jobs without an outcome as failures"
            );
            counters.failure += unaccounted;
        }

        let result = BatchResult::new(total, duration, counters);
        session.close().await;
        info!(
            successes = result.success_count,
            failures = result.failure_count,
            elapsed_secs = result.duration.as_secs_f64(),
            tps = result.throughput,
            "batch finished"
        );

        if let Some(target) = self.plan.report.clone() {
            if let Err(source) = write_report(&target, &result).await {
                self.transition(DriverState::Closed {
                    error: Some(source.to_string()),
                });
                return Err(BatchError::Report { result, source });
            }
            info!(path = %target.path.display(), "report written");
        }

        self.transition(DriverState::Closed { error: None });
        Ok(result)
    }

    fn transition(&mut self, next: DriverState) {
        info!(from = ?self.state, to = ?next, "batch state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_is_jobs_per_second() {
        let result = BatchResult::new(
            500,
            Duration::from_secs(4),
            Counters {
                success: 500,
                failure: 0,
            },
        );
        assert_eq!(result.throughput, 125.0);
    }

    #[test]
    fn zero_duration_has_zero_throughput() {
        let result = BatchResult::new(0, Duration::ZERO, Counters::default());
        assert_eq!(result.throughput, 0.0);
    }
}
