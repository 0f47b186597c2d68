//! Error types for the mock backend.

use thiserror::Error;
use tonic::Status;

/// Faults raised by the mock server and its services.
///
/// Startup faults (`Io`, `Credentials`, `Config`, `Transport` at bind time)
/// abort the process before any stream is served. Stream-scoped faults are
/// carried to the affected caller as a [`Status`] and never touch the
/// shared queue or unrelated streams.
#[derive(Debug, Error)]
pub enum MockError {
    /// Listen socket could not be bound, or another I/O fault occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS credential material could not be read or parsed.
    #[error("invalid TLS credentials: {0}")]
    Credentials(String),

    /// The underlying transport failed to start or serve.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Configuration values are missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The RPC shape exists on the wire but is not emulated by this mock.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// The shared transaction queue is closed.
    #[error("transaction queue closed")]
    QueueClosed,
}

impl From<MockError> for Status {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Unsupported(op) => {
                Status::unimplemented(format!("unsupported operation: {}", op))
            }
            MockError::QueueClosed => Status::unavailable("transaction queue closed"),
            other => Status::internal(other.to_string()),
        }
    }
}

/// Result type for mock server operations
pub type MockResult<T> = Result<T, MockError>;
