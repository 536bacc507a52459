use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use ledgerbench_core::Session;
use tracing::{debug, error, warn};

use crate::{JobQueue, ResultAggregator};

pub struct Worker<S: Session> {
    pub id: usize,
    pub queue: Arc<JobQueue>,
    pub session: Arc<S>,
    pub aggregator: Arc<ResultAggregator>,
}

impl<S: Session> Worker<S> {
    /// Drains the queue, recording one outcome per job. A failed or panicking
    /// submission never stops the worker. Returns how many jobs it handled.
    pub async fn run(self) -> u64 {
        debug!(worker_id = self.id, "worker started");
        let mut handled = 0u64;

        while let Some(job) = self.queue.dequeue().await {
            debug!(
                worker_id = self.id,
                key = %job.key,
                transaction = %job.proposal.transaction,
                kind = %job.kind,
                "submitting transaction"
            );

            let call = async {
                if job.kind.writes_ledger() {
                    self.session.submit(&job.proposal).await
                } else {
                    self.session.evaluate(&job.proposal).await
                }
            };

            match AssertUnwindSafe(call).catch_unwind().await {
                Ok(Ok(_)) => self.aggregator.record_success(),
                Ok(Err(err)) => {
                    warn!(worker_id = self.id, key = %job.key, error = %err, "transaction failed");
                    self.aggregator.record_failure();
                }
                Err(panic) => {
                    error!(
                        worker_id = self.id,
                        key = %job.key,
                        panic = panic_message(panic.as_ref()),
                        "transaction panicked"
                    );
                    self.aggregator.record_failure();
                }
            }
            handled += 1;
        }

        debug!(worker_id = self.id, handled, "worker finished");
        handled
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}
