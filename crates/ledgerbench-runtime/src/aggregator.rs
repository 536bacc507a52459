use parking_lot::Mutex;
use serde::Serialize;

/// Point-in-time copy of the outcome counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub success: u64,
    pub failure: u64,
}

impl Counters {
    pub fn total(&self) -> u64 {
        self.success + self.failure
    }
}

/// Outcome counters shared by every worker of a batch.
///
/// Both counters sit behind one lock so a snapshot always sees a consistent
/// pair.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    counters: Mutex<Counters>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.counters.lock().success += 1;
    }

    pub fn record_failure(&self) {
        self.counters.lock().failure += 1;
    }

    pub fn snapshot(&self) -> Counters {
        *self.counters.lock()
    }
}
