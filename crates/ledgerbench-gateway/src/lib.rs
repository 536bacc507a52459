//! [`Gateway`] implementation speaking the `ledgerbench.gateway.v1` gRPC
//! protocol.
//!
//! The peer must serve that protocol. Stock Hyperledger Fabric peers expose
//! `gateway.Gateway` with fabric-protos envelopes instead and reject these
//! calls as unimplemented, so the built-in network profiles need a compatible
//! gateway in front of the peer.
//!
//! A session holds one multiplexed HTTP/2 channel; every worker clones the
//! generated client, so concurrent submissions need no extra locking.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use ledgerbench_core::{
    ConnectError, ConnectOptions, ContractTarget, Endpoint, Gateway, Identity, Proposal, Session,
    Signer, SubmitError, Timeouts,
};
use ledgerbench_proto::ledgerbench::gateway::v1 as pb;
use ledgerbench_proto::ledgerbench::gateway::v1::gateway_client::GatewayClient;
use tonic::transport::{Certificate, Channel, ClientTlsConfig};
use tonic::Code;
use tracing::{debug, info};

pub mod credentials;
mod envelope;

pub use credentials::{load_identity, EcdsaSigner};
pub use envelope::transaction_id;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, Default)]
pub struct GrpcGateway;

impl GrpcGateway {
    pub fn new() -> Self {
        Self
    }
}

pub struct GrpcSession {
    client: GatewayClient<Channel>,
    identity: Identity,
    signer: Arc<dyn Signer>,
    timeouts: Timeouts,
    target: ContractTarget,
    closed: AtomicBool,
}

#[async_trait]
impl Gateway for GrpcGateway {
    type Session = GrpcSession;

    fn name(&self) -> &'static str {
        "grpc"
    }

    async fn connect(&self, options: ConnectOptions) -> Result<GrpcSession, ConnectError> {
        let channel = open_channel(&options.endpoint).await?;
        info!(
            address = %options.endpoint.address,
            msp_id = %options.identity.msp_id,
            channel = %options.target.channel,
            chaincode = %options.target.chaincode,
            "connected to gateway"
        );

        Ok(GrpcSession {
            client: GatewayClient::new(channel),
            identity: options.identity,
            signer: options.signer,
            timeouts: options.timeouts,
            target: options.target,
            closed: AtomicBool::new(false),
        })
    }
}

async fn open_channel(endpoint: &Endpoint) -> Result<Channel, ConnectError> {
    let uri = if endpoint.address.contains("://") {
        endpoint.address.clone()
    } else if endpoint.tls_ca_path.is_some() {
        format!("https://{}", endpoint.address)
    } else {
        format!("http://{}", endpoint.address)
    };
    let invalid = |reason: String| ConnectError::InvalidEndpoint {
        address: endpoint.address.clone(),
        reason,
    };

    let mut builder = tonic::transport::Endpoint::from_shared(uri)
        .map_err(|e| invalid(e.to_string()))?
        .connect_timeout(CONNECT_TIMEOUT);

    if let Some(ca_path) = &endpoint.tls_ca_path {
        let pem = tokio::fs::read(ca_path)
            .await
            .map_err(|e| ConnectError::Credentials {
                path: ca_path.clone(),
                reason: e.to_string(),
            })?;
        let tls = ClientTlsConfig::new()
            .ca_certificate(Certificate::from_pem(pem))
            .domain_name(endpoint.server_name.clone());
        builder = builder.tls_config(tls).map_err(|e| invalid(e.to_string()))?;
    }

    builder
        .connect()
        .await
        .map_err(|e| ConnectError::Unreachable {
            address: endpoint.address.clone(),
            reason: e.to_string(),
        })
}

impl GrpcSession {
    fn client(&self) -> Result<GatewayClient<Channel>, SubmitError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SubmitError::Closed);
        }
        Ok(self.client.clone())
    }
}

#[async_trait]
impl Session for GrpcSession {
    async fn submit(&self, proposal: &Proposal) -> Result<Bytes, SubmitError> {
        let mut client = self.client()?;
        let prepared = envelope::sign_proposal(
            &self.identity,
            self.signer.as_ref(),
            &self.target,
            proposal,
        )?;
        let transaction_id = prepared.transaction_id;

        let endorse = pb::EndorseRequest {
            transaction_id: transaction_id.clone(),
            channel_id: self.target.channel.clone(),
            proposed_transaction: Some(prepared.signed),
        };
        let endorsed = call(
            "endorse",
            self.timeouts.endorse,
            SubmitError::Endorse,
            client.endorse(request(endorse, self.timeouts.endorse)),
        )
        .await?;

        let mut transaction = endorsed
            .prepared_transaction
            .ok_or_else(|| SubmitError::Endorse("gateway returned no transaction".into()))?;
        transaction.signature = self.signer.sign(&transaction.payload)?;

        let submit = pb::SubmitRequest {
            transaction_id: transaction_id.clone(),
            channel_id: self.target.channel.clone(),
            prepared_transaction: Some(transaction),
        };
        call(
            "submit",
            self.timeouts.submit,
            SubmitError::Submit,
            client.submit(request(submit, self.timeouts.submit)),
        )
        .await?;

        let status_request = envelope::sign_commit_status(
            &self.identity,
            self.signer.as_ref(),
            &self.target.channel,
            &transaction_id,
        )?;
        let status = call(
            "commit status",
            self.timeouts.commit_status,
            SubmitError::CommitStatus,
            client.commit_status(request(status_request, self.timeouts.commit_status)),
        )
        .await?;

        if status.result != pb::TxValidationCode::Valid as i32 {
            return Err(SubmitError::Commit {
                transaction_id,
                code: status.result,
            });
        }
        debug!(%transaction_id, block = status.block_number, "transaction committed");
        Ok(Bytes::from(endorsed.result))
    }

    async fn evaluate(&self, proposal: &Proposal) -> Result<Bytes, SubmitError> {
        let mut client = self.client()?;
        let prepared = envelope::sign_proposal(
            &self.identity,
            self.signer.as_ref(),
            &self.target,
            proposal,
        )?;

        let evaluate = pb::EvaluateRequest {
            transaction_id: prepared.transaction_id,
            channel_id: self.target.channel.clone(),
            proposed_transaction: Some(prepared.signed),
        };
        let response = call(
            "evaluate",
            self.timeouts.evaluate,
            SubmitError::Evaluate,
            client.evaluate(request(evaluate, self.timeouts.evaluate)),
        )
        .await?;
        Ok(Bytes::from(response.result))
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("gateway session closed");
        }
    }
}

fn request<T>(message: T, timeout: Duration) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    request.set_timeout(timeout);
    request
}

/// Awaits one RPC under a client-side deadline, mapping failures onto the
/// stage's error variant.
async fn call<T, F>(
    stage: &'static str,
    limit: Duration,
    failed: fn(String) -> SubmitError,
    rpc: F,
) -> Result<T, SubmitError>
where
    F: Future<Output = Result<tonic::Response<T>, tonic::Status>>,
{
    match tokio::time::timeout(limit, rpc).await {
        Err(_) => Err(SubmitError::Timeout { stage }),
        Ok(Err(status)) if status.code() == Code::DeadlineExceeded => {
            Err(SubmitError::Timeout { stage })
        }
        Ok(Err(status)) => Err(failed(format!(
            "{:?}: {}",
            status.code(),
            status.message()
        ))),
        Ok(Ok(response)) => Ok(response.into_inner()),
    }
}
