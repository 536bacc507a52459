//! Organization profiles for the automobile test networks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ledgerbench_core::{Profile, ProfileTable};

const AUTO_ORGS: &str = "../Automobile-Network/organizations/peerOrganizations";
const MINIFAB_ORGS: &str = "../MinifabNetwork/vars/keyfiles/peerOrganizations";

fn auto_profile(org: &str, user: &str, port: u16, msp_id: &str) -> Profile {
    let domain = format!("{org}.auto.com");
    let msp = format!("{AUTO_ORGS}/{domain}/users/{user}@{domain}/msp");
    Profile {
        cert_path: PathBuf::from(format!("{msp}/signcerts/cert.pem")),
        key_path: PathBuf::from(format!("{msp}/keystore/")),
        tls_cert_path: Some(PathBuf::from(format!(
            "{AUTO_ORGS}/{domain}/peers/peer0.{domain}/tls/ca.crt"
        ))),
        peer_endpoint: format!("localhost:{port}"),
        gateway_peer: format!("peer0.{domain}"),
        msp_id: msp_id.to_string(),
    }
}

fn minifab_profile(org: &str, port: u16) -> Profile {
    let domain = format!("{org}.auto.com");
    let msp = format!("{MINIFAB_ORGS}/{domain}/users/Admin@{domain}/msp");
    Profile {
        cert_path: PathBuf::from(format!("{msp}/signcerts/Admin@{domain}-cert.pem")),
        key_path: PathBuf::from(format!("{msp}/keystore/")),
        tls_cert_path: Some(PathBuf::from(format!(
            "{MINIFAB_ORGS}/{domain}/peers/peer1.{domain}/tls/ca.crt"
        ))),
        peer_endpoint: format!("localhost:{port}"),
        gateway_peer: format!("peer1.{domain}"),
        msp_id: format!("{org}-auto-com"),
    }
}

pub fn builtin() -> ProfileTable {
    [
        ("manufacturer", auto_profile("manufacturer", "User1", 7051, "ManufacturerMSP")),
        ("dealer", auto_profile("dealer", "User1", 9051, "DealerMSP")),
        ("mvd", auto_profile("mvd", "User1", 11051, "MvdMSP")),
        ("manufacturer2", auto_profile("manufacturer", "User2", 7051, "ManufacturerMSP")),
        ("minifab-manufacturer", minifab_profile("manufacturer", 7003)),
        ("minifab-dealer", minifab_profile("dealer", 7004)),
        ("minifab-mvd", minifab_profile("mvd", 7005)),
    ]
    .into_iter()
    .map(|(name, profile)| (name.to_string(), profile))
    .collect()
}

/// Built-in profiles, with entries from `path` added or replacing them.
pub fn load(path: Option<&Path>) -> Result<ProfileTable> {
    let mut table = builtin();
    if let Some(path) = path {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading profiles from {}", path.display()))?;
        let overrides: ProfileTable = toml::from_str(&raw)
            .with_context(|| format!("parsing profiles in {}", path.display()))?;
        tracing::debug!(path = %path.display(), count = overrides.len(), "loaded profile overrides");
        table.extend(overrides);
    }
    Ok(table)
}
