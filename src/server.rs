//! Server bootstrap: queue wiring, socket bind, transport security.

use std::net::SocketAddr;

use slog::Logger;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Server, ServerTlsConfig};

use crate::config::MockConfig;
use crate::error::MockResult;
use crate::proto::delivery_service_server::DeliveryServiceServer;
use crate::proto::endorsement_service_server::EndorsementServiceServer;
use crate::proto::ordering_service_server::OrderingServiceServer;
use crate::queue::{self, Submission};
use crate::services::{DeliveryServiceImpl, EndorsementServiceImpl, OrderingServiceImpl};
use crate::tls;

/// An unbound mock server: configuration plus a logger.
pub struct MockServer {
    config: MockConfig,
    logger: Logger,
}

impl MockServer {
    /// Create a new mock server with the given configuration.
    pub fn new(config: MockConfig, logger: Logger) -> Self {
        Self { config, logger }
    }

    /// Bind the listen socket and load credential material.
    ///
    /// Every startup fault (bad config, unbindable address, unreadable or
    /// malformed credentials) surfaces here, before any service logic
    /// runs. Port 0 requests an ephemeral port; the resolved address is
    /// available from [`BoundServer::local_addr`].
    pub async fn bind(self) -> MockResult<BoundServer> {
        self.config.validate()?;

        let tls = if self.config.mtls {
            Some(tls::load_mtls(&self.config.tls)?)
        } else {
            None
        };

        let listener = TcpListener::bind(self.config.listen_addr).await?;
        let local_addr = listener.local_addr()?;

        Ok(BoundServer {
            config: self.config,
            logger: self.logger,
            listener,
            local_addr,
            tls,
        })
    }
}

/// A mock server whose socket is bound and whose credentials are loaded.
#[derive(Debug)]
pub struct BoundServer {
    config: MockConfig,
    logger: Logger,
    listener: TcpListener,
    local_addr: SocketAddr,
    tls: Option<ServerTlsConfig>,
}

impl BoundServer {
    /// The resolved listen address (meaningful when port 0 was requested).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the process is stopped.
    ///
    /// Constructs the shared transaction queue and hands its ends to the
    /// two streaming services; the queue is the only state they share.
    /// Each active stream runs as its own task.
    pub async fn serve(self) -> MockResult<()> {
        let (producer, consumer) = queue::bounded::<Submission>(self.config.queue_capacity);

        let ordering = OrderingServiceImpl::new(
            producer,
            self.logger.new(slog::o!("service" => "ordering")),
        );
        let delivery = DeliveryServiceImpl::new(
            consumer,
            self.config.block_size,
            self.logger.new(slog::o!("service" => "delivery")),
        );
        let endorsement = EndorsementServiceImpl::new();

        slog::info!(self.logger, "mock backend listening";
            "addr" => %self.local_addr,
            "mtls" => self.config.mtls,
            "block_size" => self.config.block_size,
            "queue_capacity" => self.config.queue_capacity,
        );

        let mut builder = Server::builder();
        if let Some(tls) = self.tls {
            builder = builder.tls_config(tls)?;
        }

        builder
            .add_service(OrderingServiceServer::new(ordering))
            .add_service(DeliveryServiceServer::new(delivery))
            .add_service(EndorsementServiceServer::new(endorsement))
            .serve_with_incoming(TcpListenerStream::new(self.listener))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;
    use crate::error::MockError;

    fn test_logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    #[tokio::test]
    async fn bind_resolves_ephemeral_port() {
        let config = MockConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            ..MockConfig::default()
        };
        let bound = MockServer::new(config, test_logger()).bind().await.unwrap();
        assert_ne!(bound.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn bind_rejects_invalid_config() {
        let config = MockConfig {
            block_size: 0,
            ..MockConfig::default()
        };
        let err = MockServer::new(config, test_logger())
            .bind()
            .await
            .unwrap_err();
        assert!(matches!(err, MockError::Config(_)));
    }

    #[tokio::test]
    async fn bind_fails_fatally_on_missing_credentials() {
        let config = MockConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            mtls: true,
            tls: TlsConfig {
                cert_path: "no-such-dir/server.crt".into(),
                key_path: "no-such-dir/server.key".into(),
                ca_path: "no-such-dir/ca.crt".into(),
            },
            ..MockConfig::default()
        };
        let err = MockServer::new(config, test_logger())
            .bind()
            .await
            .unwrap_err();
        assert!(matches!(err, MockError::Credentials(_)));
    }
}
