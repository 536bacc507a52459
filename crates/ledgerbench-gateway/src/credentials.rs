//! Client identity and signing key loading.
//!
//! Certificates are passed through as PEM bytes. Keys are P-256, read from a
//! PKCS#8 (`PRIVATE KEY`) or SEC1 (`EC PRIVATE KEY`) PEM file. When the
//! configured key path is a keystore directory, its first file is used.

use std::fs;
use std::path::{Path, PathBuf};

use ledgerbench_core::{ConnectError, Identity, SignError, Signer};
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::DecodePrivateKey;
use p256::SecretKey;

pub fn load_identity(msp_id: &str, cert_path: &Path) -> Result<Identity, ConnectError> {
    let pem = fs::read(cert_path).map_err(|e| credentials_error(cert_path, e))?;
    Ok(Identity::new(msp_id, pem))
}

/// ECDSA P-256 signer producing low-S, DER-encoded signatures over the
/// SHA-256 digest of the message.
#[derive(Clone)]
pub struct EcdsaSigner {
    key: SigningKey,
}

impl EcdsaSigner {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    pub fn from_pem(pem: &str) -> Result<Self, SignError> {
        let secret = SecretKey::from_pkcs8_pem(pem)
            .or_else(|_| SecretKey::from_sec1_pem(pem))
            .map_err(|e| SignError::Failed(format!("unsupported private key: {e}")))?;
        Ok(Self::new(SigningKey::from(&secret)))
    }

    /// Reads the key at `key_path`, or the first file inside it when it is a
    /// directory.
    pub fn load(key_path: &Path) -> Result<Self, ConnectError> {
        let file = if key_path.is_dir() {
            first_file(key_path)?
        } else {
            key_path.to_path_buf()
        };
        let pem = fs::read_to_string(&file).map_err(|e| credentials_error(&file, e))?;
        Self::from_pem(&pem).map_err(|e| credentials_error(&file, e))
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        *self.key.verifying_key()
    }
}

impl Signer for EcdsaSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignError> {
        let signature: Signature = self
            .key
            .try_sign(message)
            .map_err(|e| SignError::Failed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

impl std::fmt::Debug for EcdsaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

fn first_file(dir: &Path) -> Result<PathBuf, ConnectError> {
    let entries = fs::read_dir(dir).map_err(|e| credentials_error(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| credentials_error(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    files
        .into_iter()
        .next()
        .ok_or_else(|| credentials_error(dir, "keystore directory is empty"))
}

fn credentials_error(path: &Path, reason: impl ToString) -> ConnectError {
    ConnectError::Credentials {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
