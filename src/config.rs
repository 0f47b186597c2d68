//! Mock server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::MockError;

/// Credential material paths for mutual-authentication mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Server certificate (PEM)
    pub cert_path: PathBuf,
    /// Server private key (PEM)
    pub key_path: PathBuf,
    /// Trust anchor used to verify client certificates (PEM)
    pub ca_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("tls/server.crt"),
            key_path: PathBuf::from("tls/server.key"),
            ca_path: PathBuf::from("tls/ca.crt"),
        }
    }
}

/// Configuration for the mock backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Address to listen on. Port 0 requests an ephemeral port; the
    /// resolved address is reported once the socket is bound.
    #[serde(with = "socket_addr_serde")]
    pub listen_addr: SocketAddr,
    /// Number of drained transactions that make up one filtered block
    pub block_size: u64,
    /// Capacity of the shared transaction queue; a full queue blocks
    /// producers rather than dropping submissions
    pub queue_capacity: usize,
    /// Require and verify client certificates (mutual TLS)
    pub mtls: bool,
    /// Credential material used when `mtls` is enabled
    pub tls: TlsConfig,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:10086".parse().unwrap(),
            block_size: 10,
            queue_capacity: 1000,
            mtls: false,
            tls: TlsConfig::default(),
        }
    }
}

impl MockConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables with the `LEDGER_MOCK_` prefix override file
    /// values. Missing keys fall back to the defaults.
    ///
    /// # Example config (TOML)
    /// ```toml
    /// listen_addr = "127.0.0.1:10086"
    /// block_size = 10
    /// queue_capacity = 1000
    /// mtls = false
    ///
    /// [tls]
    /// cert_path = "tls/server.crt"
    /// key_path = "tls/server.key"
    /// ca_path = "tls/ca.crt"
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Figment::new().merge(Toml::file_exact(path)),
            Some(ext) => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .toml",
                    ext
                ));
            }
            None => {
                return Err(anyhow::anyhow!("Config file must have a .toml extension"));
            }
        };

        // Environment variables take precedence over file config
        let config: MockConfig = figment.merge(Env::prefixed("LEDGER_MOCK_")).extract()?;

        Ok(config)
    }

    /// Check values that must hold before the server starts.
    pub fn validate(&self) -> Result<(), MockError> {
        if self.block_size == 0 {
            return Err(MockError::Config("block_size must be positive".into()));
        }
        if self.queue_capacity == 0 {
            return Err(MockError::Config("queue_capacity must be positive".into()));
        }
        Ok(())
    }
}

/// Custom serde module for SocketAddr to handle string serialization.
mod socket_addr_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::net::SocketAddr;

    pub fn serialize<S>(addr: &SocketAddr, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        addr.to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SocketAddr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
