//! Error types shared by gateways and the batch runtime.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a session from being established. Always fatal to a
/// batch.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("failed to load credentials from {}: {reason}", path.display())]
    Credentials { path: PathBuf, reason: String },

    #[error("invalid gateway endpoint `{address}`: {reason}")]
    InvalidEndpoint { address: String, reason: String },

    #[error("gateway unreachable at {address}: {reason}")]
    Unreachable { address: String, reason: String },
}

/// Failures of a single transaction. Absorbed by the worker that ran it.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("endorsement failed: {0}")]
    Endorse(String),

    #[error("submission to orderer failed: {0}")]
    Submit(String),

    #[error("transaction {transaction_id} committed with status {code}")]
    Commit { transaction_id: String, code: i32 },

    #[error("commit status unavailable: {0}")]
    CommitStatus(String),

    #[error("evaluation failed: {0}")]
    Evaluate(String),

    #[error("{stage} timed out")]
    Timeout { stage: &'static str },

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error("session is closed")]
    Closed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("signing failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("no connection profile for organization `{0}`")]
    NotFound(String),
}
