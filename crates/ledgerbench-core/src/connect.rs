use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::{Identity, Signer};

/// Where the gateway peer lives and how to reach it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// `host:port` of the gateway peer.
    pub address: String,
    /// Name the peer's TLS certificate was issued for.
    pub server_name: String,
    /// CA certificate used to verify the peer. `None` connects in plaintext.
    pub tls_ca_path: Option<PathBuf>,
}

/// Per-call deadlines, fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub evaluate: Duration,
    pub endorse: Duration,
    pub submit: Duration,
    pub commit_status: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            evaluate: Duration::from_secs(5),
            endorse: Duration::from_secs(30),
            submit: Duration::from_secs(5),
            commit_status: Duration::from_secs(60),
        }
    }
}

/// The smart contract every transaction of a batch targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractTarget {
    pub channel: String,
    pub chaincode: String,
    /// Contract name inside the chaincode. Empty selects the default contract.
    pub contract: String,
}

impl ContractTarget {
    /// Fully qualified transaction name, `contract:name` when a contract is set.
    pub fn qualified(&self, transaction: &str) -> String {
        if self.contract.is_empty() {
            transaction.to_string()
        } else {
            format!("{}:{}", self.contract, transaction)
        }
    }
}

/// Everything [`crate::Gateway::connect`] needs.
#[derive(Clone)]
pub struct ConnectOptions {
    pub identity: Identity,
    pub signer: Arc<dyn Signer>,
    pub endpoint: Endpoint,
    pub timeouts: Timeouts,
    pub target: ContractTarget,
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("identity", &self.identity.msp_id)
            .field("signer", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("timeouts", &self.timeouts)
            .field("target", &self.target)
            .finish()
    }
}
