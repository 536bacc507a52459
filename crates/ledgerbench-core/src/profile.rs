use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Endpoint, ProfileError};

/// Connection and credential settings for one organization's client user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "certPath")]
    pub cert_path: PathBuf,
    /// Keystore directory, or a single key file.
    #[serde(rename = "keyPath")]
    pub key_path: PathBuf,
    #[serde(rename = "tlsCertPath", default)]
    pub tls_cert_path: Option<PathBuf>,
    #[serde(rename = "peerEndpoint")]
    pub peer_endpoint: String,
    #[serde(rename = "gatewayPeer")]
    pub gateway_peer: String,
    #[serde(rename = "mspID")]
    pub msp_id: String,
}

impl Profile {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            address: self.peer_endpoint.clone(),
            server_name: self.gateway_peer.clone(),
            tls_ca_path: self.tls_cert_path.clone(),
        }
    }
}

/// Organization name to [`Profile`] lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileTable {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, organization: impl Into<String>, profile: Profile) -> Option<Profile> {
        self.profiles.insert(organization.into(), profile)
    }

    /// Adds every entry of `other`, replacing profiles with the same name.
    pub fn extend(&mut self, other: ProfileTable) {
        self.profiles.extend(other.profiles);
    }

    pub fn lookup(&self, organization: &str) -> Result<&Profile, ProfileError> {
        self.profiles
            .get(organization)
            .ok_or_else(|| ProfileError::NotFound(organization.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<(String, Profile)> for ProfileTable {
    fn from_iter<I: IntoIterator<Item = (String, Profile)>>(iter: I) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}
