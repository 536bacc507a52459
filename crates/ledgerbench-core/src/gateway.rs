use async_trait::async_trait;
use bytes::Bytes;

use crate::{ConnectError, ConnectOptions, Proposal, SubmitError};

/// Produces sessions against one kind of ledger gateway.
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    type Session: Session;

    fn name(&self) -> &'static str;

    /// Establishes the single session a batch runs against.
    async fn connect(&self, options: ConnectOptions) -> Result<Self::Session, ConnectError>;
}

/// A connected route to the ledger.
///
/// Workers share one session and call it concurrently without any locking on
/// their side, so implementations must be safe for concurrent use.
#[async_trait]
pub trait Session: Send + Sync + 'static {
    /// Endorses, orders and waits for commit of one transaction.
    async fn submit(&self, proposal: &Proposal) -> Result<Bytes, SubmitError>;

    /// Runs a transaction against the ledger without writing to it.
    async fn evaluate(&self, proposal: &Proposal) -> Result<Bytes, SubmitError>;

    /// Releases the session. Calling it again has no effect.
    async fn close(&self);
}
