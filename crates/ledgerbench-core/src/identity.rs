use bytes::Bytes;

use crate::SignError;

/// The client identity presented to the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub msp_id: String,
    /// PEM-encoded X.509 certificate.
    pub credentials: Bytes,
}

impl Identity {
    pub fn new(msp_id: impl Into<String>, credentials: impl Into<Bytes>) -> Self {
        Self {
            msp_id: msp_id.into(),
            credentials: credentials.into(),
        }
    }
}

/// Signs proposal, envelope and commit-status payloads on behalf of an
/// [`Identity`].
pub trait Signer: Send + Sync + 'static {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignError>;
}

impl<F> Signer for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, SignError> + Send + Sync + 'static,
{
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignError> {
        self(message)
    }
}
