use ledgerbench_core::{ContractTarget, Identity, Proposal, SignError, Signer};
use ledgerbench_proto::ledgerbench::gateway::v1 as pb;
use prost::Message;
use rand::Rng;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 24;

pub(crate) struct SignedProposal {
    pub transaction_id: String,
    pub signed: pb::SignedProposal,
}

pub(crate) fn creator(identity: &Identity) -> pb::SerializedIdentity {
    pb::SerializedIdentity {
        msp_id: identity.msp_id.clone(),
        id_bytes: identity.credentials.to_vec(),
    }
}

/// Hex SHA-256 of the nonce followed by the encoded creator.
pub fn transaction_id(nonce: &[u8], creator: &pb::SerializedIdentity) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator.encode_to_vec());
    hex::encode(hasher.finalize())
}

pub(crate) fn sign_proposal(
    identity: &Identity,
    signer: &dyn Signer,
    target: &ContractTarget,
    proposal: &Proposal,
) -> Result<SignedProposal, SignError> {
    let creator = creator(identity);
    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill(&mut nonce);
    let transaction_id = transaction_id(&nonce, &creator);

    let body = pb::Proposal {
        transaction_id: transaction_id.clone(),
        channel_id: target.channel.clone(),
        chaincode_id: target.chaincode.clone(),
        function: target.qualified(&proposal.transaction),
        args: proposal.args.iter().map(|a| a.as_bytes().to_vec()).collect(),
        transient: proposal
            .transient
            .iter()
            .map(|(k, v)| (k.clone(), v.to_vec()))
            .collect(),
        creator: Some(creator),
        nonce: nonce.to_vec(),
    };
    let proposal_bytes = body.encode_to_vec();
    let signature = signer.sign(&proposal_bytes)?;

    Ok(SignedProposal {
        transaction_id,
        signed: pb::SignedProposal {
            proposal_bytes,
            signature,
        },
    })
}

pub(crate) fn sign_commit_status(
    identity: &Identity,
    signer: &dyn Signer,
    channel: &str,
    transaction_id: &str,
) -> Result<pb::SignedCommitStatusRequest, SignError> {
    let request = pb::CommitStatusRequest {
        transaction_id: transaction_id.to_string(),
        channel_id: channel.to_string(),
        identity: Some(creator(identity)),
    }
    .encode_to_vec();
    let signature = signer.sign(&request)?;
    Ok(pb::SignedCommitStatusRequest { request, signature })
}
