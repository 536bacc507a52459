#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use ledgerbench_core::{
    ConnectError, ConnectOptions, ContractTarget, Endpoint, Gateway, Identity, Proposal, Session,
    SignError, Signer, SubmitError, Timeouts,
};
use parking_lot::Mutex;

type FailWhen = dyn Fn(&Proposal) -> bool + Send + Sync;

/// What the mock ledger saw, shared between the test and the session.
#[derive(Default)]
pub struct Probe {
    pub submitted: Mutex<Vec<String>>,
    pub evaluated: Mutex<Vec<String>>,
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Probe {
    pub fn submitted_keys(&self) -> Vec<String> {
        let mut keys = self.submitted.lock().clone();
        keys.sort();
        keys
    }
}

pub struct MockGateway {
    pub probe: Arc<Probe>,
    refuse: bool,
    fail_when: Arc<FailWhen>,
    panic_when: Arc<FailWhen>,
    latency: Duration,
}

impl MockGateway {
    pub fn succeeding() -> Self {
        Self::failing_when(|_| false)
    }

    pub fn failing_when(f: impl Fn(&Proposal) -> bool + Send + Sync + 'static) -> Self {
        Self {
            probe: Arc::new(Probe::default()),
            refuse: false,
            fail_when: Arc::new(f),
            panic_when: Arc::new(|_| false),
            latency: Duration::ZERO,
        }
    }

    /// A session that panics mid-call for matching proposals.
    pub fn panicking_when(f: impl Fn(&Proposal) -> bool + Send + Sync + 'static) -> Self {
        Self {
            panic_when: Arc::new(f),
            ..Self::succeeding()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            refuse: true,
            ..Self::succeeding()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl Gateway for MockGateway {
    type Session = MockSession;

    fn name(&self) -> &'static str {
        "mock"
    }

    async fn connect(&self, options: ConnectOptions) -> Result<MockSession, ConnectError> {
        if self.refuse {
            return Err(ConnectError::Unreachable {
                address: options.endpoint.address,
                reason: "connection refused".into(),
            });
        }
        self.probe.connects.fetch_add(1, Ordering::SeqCst);
        Ok(MockSession {
            probe: self.probe.clone(),
            fail_when: self.fail_when.clone(),
            panic_when: self.panic_when.clone(),
            latency: self.latency,
            closed: AtomicBool::new(false),
        })
    }
}

pub struct MockSession {
    probe: Arc<Probe>,
    fail_when: Arc<FailWhen>,
    panic_when: Arc<FailWhen>,
    latency: Duration,
    closed: AtomicBool,
}

impl MockSession {
    async fn call(&self, proposal: &Proposal, log: &Mutex<Vec<String>>) -> Result<Bytes, SubmitError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SubmitError::Closed);
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        log.lock().push(proposal.args.first().cloned().unwrap_or_default());
        if (self.panic_when)(proposal) {
            panic!("session blew up on {:?}", proposal.args.first());
        }
        if (self.fail_when)(proposal) {
            return Err(SubmitError::Endorse("chaincode returned 500".into()));
        }
        Ok(Bytes::from_static(b"ok"))
    }
}

#[async_trait]
impl Session for MockSession {
    async fn submit(&self, proposal: &Proposal) -> Result<Bytes, SubmitError> {
        self.call(proposal, &self.probe.submitted).await
    }

    async fn evaluate(&self, proposal: &Proposal) -> Result<Bytes, SubmitError> {
        self.call(proposal, &self.probe.evaluated).await
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.probe.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub fn connect_options() -> ConnectOptions {
    let signer: Arc<dyn Signer> =
        Arc::new(|_msg: &[u8]| -> Result<Vec<u8>, SignError> { Ok(Vec::new()) });
    ConnectOptions {
        identity: Identity::new("ManufacturerMSP", Bytes::from_static(b"cert")),
        signer,
        endpoint: Endpoint {
            address: "localhost:7051".into(),
            server_name: "peer0.manufacturer.auto.com".into(),
            tls_ca_path: None,
        },
        timeouts: Timeouts::default(),
        target: ContractTarget {
            channel: "autochannel".into(),
            chaincode: "KBA-Automobile".into(),
            contract: "CarContract".into(),
        },
    }
}

/// Job index parsed back out of a `Car-<n>` key.
pub fn key_index(proposal: &Proposal) -> u64 {
    proposal
        .args
        .first()
        .and_then(|key| key.rsplit('-').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(u64::MAX)
}

pub fn transient(entries: &[(&str, &str)]) -> BTreeMap<String, Bytes> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Bytes::copy_from_slice(v.as_bytes())))
        .collect()
}
