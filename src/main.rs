//! Mock backend binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use ledger_mock::{MockConfig, MockServer};
use slog::{Drain, Level, Logger, o};

#[derive(Parser)]
#[command(
    name = "ledger-mock",
    about = "Deterministic mock orderer/peer backend for throughput testing",
    version
)]
struct Cli {
    /// TOML configuration file; flags below override its values
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Listen address (port 0 picks an ephemeral port)
    #[arg(long, env = "LEDGER_MOCK_LISTEN_ADDR")]
    listen: Option<SocketAddr>,

    /// Transactions per filtered block
    #[arg(long, env = "LEDGER_MOCK_BLOCK_SIZE")]
    block_size: Option<u64>,

    /// Require and verify client certificates (mutual TLS)
    #[arg(long, env = "LEDGER_MOCK_MTLS")]
    mtls: bool,
}

fn build_logger() -> Logger {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|env_str| Level::from_str(&env_str).ok())
        .unwrap_or(Level::Info);

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain)
        .build()
        .fuse()
        .filter_level(log_level)
        .fuse();

    Logger::root(drain, o!())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = build_logger();

    let mut config = match &cli.config {
        Some(path) => MockConfig::from_path(path)
            .with_context(|| format!("error loading config file {}", path.display()))?,
        None => MockConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }
    if cli.mtls {
        config.mtls = true;
    }

    let server = MockServer::new(config, logger)
        .bind()
        .await
        .context("error starting mock backend")?;

    server.serve().await.context("mock backend terminated")?;

    Ok(())
}
