use std::collections::BTreeMap;

use bytes::Bytes;
use ledgerbench_core::{Proposal, TxKind};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Replaced by the job's unique key.
pub const KEY_PLACEHOLDER: &str = "{key}";
/// Replaced by the batch's random payload.
pub const PAYLOAD_PLACEHOLDER: &str = "{payload}";

/// One transaction submission. Immutable once enqueued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    /// Position in the batch, `0..total_jobs`.
    pub id: u64,
    /// Unique ledger key the transaction creates or touches.
    pub key: String,
    pub kind: TxKind,
    pub proposal: Proposal,
}

/// Describes every job of a batch. Arguments may reference
/// [`KEY_PLACEHOLDER`] and [`PAYLOAD_PLACEHOLDER`].
#[derive(Clone, Debug)]
pub struct JobTemplate {
    pub transaction: String,
    pub kind: TxKind,
    pub args: Vec<String>,
    pub transient: BTreeMap<String, Bytes>,
    pub key_prefix: String,
    /// Length of the random alphanumeric payload. Zero disables generation.
    pub payload_size: usize,
}

impl JobTemplate {
    pub fn new(transaction: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            transaction: transaction.into(),
            kind: TxKind::Invoke,
            args,
            transient: BTreeMap::new(),
            key_prefix: "Car".to_string(),
            payload_size: 0,
        }
    }

    pub fn with_kind(mut self, kind: TxKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_payload_size(mut self, size: usize) -> Self {
        self.payload_size = size;
        self
    }

    pub fn with_transient(mut self, transient: BTreeMap<String, Bytes>) -> Self {
        self.transient = transient;
        self
    }

    pub fn key(&self, id: u64) -> String {
        format!("{}-{}", self.key_prefix, id)
    }

    /// Builds job `id` with `payload` substituted for [`PAYLOAD_PLACEHOLDER`].
    pub fn job(&self, id: u64, payload: &str) -> Job {
        let key = self.key(id);
        let args = self
            .args
            .iter()
            .map(|arg| {
                arg.replace(KEY_PLACEHOLDER, &key)
                    .replace(PAYLOAD_PLACEHOLDER, payload)
            })
            .collect();

        let mut proposal = Proposal::new(self.transaction.clone(), args);
        if self.kind == TxKind::Private {
            proposal = proposal.with_transient(self.transient.clone());
        }

        Job {
            id,
            key,
            kind: self.kind,
            proposal,
        }
    }

    /// The `total` jobs of a batch. The payload is generated once and shared
    /// by every job.
    pub fn jobs(&self, total: u64) -> impl Iterator<Item = Job> + '_ {
        let payload = random_payload(self.payload_size);
        (0..total).map(move |id| self.job(id, &payload))
    }
}

/// Random string of `len` ASCII letters and digits.
pub fn random_payload(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
