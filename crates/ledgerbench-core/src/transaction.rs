use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// How a transaction reaches the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// Endorse, order and commit.
    #[default]
    Invoke,
    /// Evaluate on a peer only.
    Query,
    /// Invoke with transient (private) data attached to the proposal.
    Private,
}

impl TxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Invoke => "invoke",
            TxKind::Query => "query",
            TxKind::Private => "private",
        }
    }

    /// Whether the transaction goes through ordering and commit.
    pub fn writes_ledger(self) -> bool {
        !matches!(self, TxKind::Query)
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "invoke" => Ok(TxKind::Invoke),
            "query" => Ok(TxKind::Query),
            "private" => Ok(TxKind::Private),
            other => Err(format!(
                "unknown transaction kind `{other}` (expected invoke, query or private)"
            )),
        }
    }
}

/// One call into the target contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub transaction: String,
    pub args: Vec<String>,
    /// Private data. Never written to the ledger, only seen by endorsers.
    pub transient: BTreeMap<String, Bytes>,
}

impl Proposal {
    pub fn new(transaction: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            transaction: transaction.into(),
            args,
            transient: BTreeMap::new(),
        }
    }

    pub fn with_transient(mut self, transient: BTreeMap<String, Bytes>) -> Self {
        self.transient = transient;
        self
    }
}
