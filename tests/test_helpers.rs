//! Shared harness for integration tests: spawns a real mock backend on an
//! ephemeral port and hands out connected clients.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;

use ledger_mock::config::{MockConfig, TlsConfig};
use ledger_mock::proto::delivery_service_client::DeliveryServiceClient;
use ledger_mock::proto::endorsement_service_client::EndorsementServiceClient;
use ledger_mock::proto::ordering_service_client::OrderingServiceClient;
use ledger_mock::server::MockServer;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Identity};

pub fn test_logger() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// Config bound to an ephemeral port, small queue, default block size.
pub fn test_config() -> MockConfig {
    MockConfig {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        block_size: 10,
        queue_capacity: 64,
        mtls: false,
        tls: TlsConfig::default(),
    }
}

/// A running mock backend. The serve task is aborted on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Bind and serve the mock on its own task. Binding completes before this
/// returns, so clients can connect immediately.
pub async fn spawn_test_server(config: MockConfig) -> TestServer {
    let bound = MockServer::new(config, test_logger())
        .bind()
        .await
        .expect("bind mock server");
    let addr = bound.local_addr();
    let handle = tokio::spawn(async move {
        let _ = bound.serve().await;
    });
    TestServer { addr, handle }
}

impl TestServer {
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn ordering_client(&self) -> OrderingServiceClient<Channel> {
        OrderingServiceClient::connect(self.endpoint())
            .await
            .expect("connect ordering client")
    }

    pub async fn delivery_client(&self) -> DeliveryServiceClient<Channel> {
        DeliveryServiceClient::connect(self.endpoint())
            .await
            .expect("connect delivery client")
    }

    pub async fn endorsement_client(&self) -> EndorsementServiceClient<Channel> {
        EndorsementServiceClient::connect(self.endpoint())
            .await
            .expect("connect endorsement client")
    }
}

/// On-disk CA/server/client certificate chain for mutual-TLS tests.
pub struct TlsFixture {
    // Held so the PEM files outlive the server that reads them.
    _dir: tempfile::TempDir,
    pub server_tls: TlsConfig,
    pub ca_pem: String,
    pub client_cert_pem: String,
    pub client_key_pem: String,
}

/// Generate a throwaway CA, a server identity for localhost/127.0.0.1, and
/// a client identity, all anchored to the same CA.
pub fn generate_tls_fixture() -> TlsFixture {
    use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};

    let ca_key = KeyPair::generate().expect("generate ca key");
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).expect("ca params");
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params
        .distinguished_name
        .push(DnType::CommonName, "ledger-mock test ca");
    let ca_cert = ca_params.self_signed(&ca_key).expect("self-sign ca");

    let server_key = KeyPair::generate().expect("generate server key");
    let server_params =
        CertificateParams::new(vec!["localhost".to_string(), "127.0.0.1".to_string()])
            .expect("server params");
    let server_cert = server_params
        .signed_by(&server_key, &ca_cert, &ca_key)
        .expect("sign server cert");

    let client_key = KeyPair::generate().expect("generate client key");
    let client_params =
        CertificateParams::new(vec!["ledger-mock-client".to_string()]).expect("client params");
    let client_cert = client_params
        .signed_by(&client_key, &ca_cert, &ca_key)
        .expect("sign client cert");

    let dir = tempfile::tempdir().expect("tempdir");
    let cert_path = dir.path().join("server.crt");
    let key_path = dir.path().join("server.key");
    let ca_path = dir.path().join("ca.crt");
    fs::write(&cert_path, server_cert.pem()).expect("write server cert");
    fs::write(&key_path, server_key.serialize_pem()).expect("write server key");
    fs::write(&ca_path, ca_cert.pem()).expect("write ca cert");

    TlsFixture {
        _dir: dir,
        server_tls: TlsConfig {
            cert_path,
            key_path,
            ca_path,
        },
        ca_pem: ca_cert.pem(),
        client_cert_pem: client_cert.pem(),
        client_key_pem: client_key.serialize_pem(),
    }
}

/// Open a TLS channel to the server, optionally presenting the fixture's
/// client identity.
pub async fn mtls_channel(
    fixture: &TlsFixture,
    addr: SocketAddr,
    with_identity: bool,
) -> Result<Channel, tonic::transport::Error> {
    let mut tls = ClientTlsConfig::new()
        .ca_certificate(Certificate::from_pem(&fixture.ca_pem))
        .domain_name("localhost");
    if with_identity {
        tls = tls.identity(Identity::from_pem(
            &fixture.client_cert_pem,
            &fixture.client_key_pem,
        ));
    }

    Channel::from_shared(format!("https://{}", addr))
        .expect("endpoint uri")
        .tls_config(tls)?
        .connect()
        .await
}
