//! Deterministic mock of a two-role distributed-ledger backend.
//!
//! This crate stands in for a transaction "orderer" and a block-consuming
//! "peer" to drive throughput testing of an external benchmarking client.
//! It exposes:
//! - A bidirectional transaction-submission stream that acknowledges every
//!   envelope in submission order
//! - A subscribe-then-push delivery stream that cuts a synthetic filtered
//!   block every fixed number of drained transactions
//! - A unary proposal endorsement stub
//!
//! Transport is plaintext or mutually-authenticated TLS, selected at
//! startup. The mock performs no validation, persistence, or cryptography;
//! it only counts and batches.

pub mod config;
pub mod cutter;
pub mod error;
pub mod queue;
pub mod server;
pub mod services;
pub mod tls;

/// Generated protobuf code from tonic-build.
/// This module is populated by the build.rs script.
#[allow(clippy::all)]
#[allow(clippy::pedantic)]
pub mod proto {
    tonic::include_proto!("ledgermock.v1");
}

// Re-export key types for convenience
pub use config::{MockConfig, TlsConfig};
pub use error::MockError;
pub use server::{BoundServer, MockServer};
