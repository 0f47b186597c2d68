//! Transport credential loading for mutual-authentication mode.

use std::fs;
use std::path::Path;

use tonic::transport::{Certificate, Identity, ServerTlsConfig};

use crate::config::TlsConfig;
use crate::error::{MockError, MockResult};

/// Load the server identity and the client trust anchor, producing a
/// transport config that requires and verifies a client certificate on
/// every connection.
///
/// Unreadable or non-PEM input is a startup fault; the server must not
/// come up half-secured.
pub fn load_mtls(tls: &TlsConfig) -> MockResult<ServerTlsConfig> {
    let cert = read_pem(&tls.cert_path, "server certificate")?;
    let key = read_pem(&tls.key_path, "server private key")?;
    let ca = read_pem(&tls.ca_path, "client trust anchor")?;

    let identity = Identity::from_pem(cert, key);
    let anchor = Certificate::from_pem(ca);

    Ok(ServerTlsConfig::new()
        .identity(identity)
        .client_ca_root(anchor))
}

fn read_pem(path: &Path, what: &str) -> MockResult<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| {
        MockError::Credentials(format!("read {} {}: {}", what, path.display(), e))
    })?;
    // Cheap structural check so obviously-bad material fails at startup
    // instead of on the first handshake.
    let looks_like_pem = std::str::from_utf8(&bytes)
        .map(|s| s.contains("-----BEGIN"))
        .unwrap_or(false);
    if !looks_like_pem {
        return Err(MockError::Credentials(format!(
            "{} {} is not PEM-encoded",
            what,
            path.display()
        )));
    }
    Ok(bytes)
}
