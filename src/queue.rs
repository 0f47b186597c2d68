//! Bounded FIFO hand-off between the ingestion and delivery paths.
//!
//! The queue is the only synchronization point between the two service
//! roles and the only shared mutable state in the process. It is
//! deliberately independent of any streaming transport so it can be
//! unit-tested without network I/O.
//!
//! Semantics:
//! - enqueue waits (does not spin, drop, or error) while the queue is full
//! - dequeue waits while the queue is empty
//! - once every producer is gone, dequeue drains the remaining items and
//!   then signals exhaustion with `None`

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::error::MockError;

/// Opaque token standing in for one submitted transaction. Only its
/// arrival is significant; the mock never inspects payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission;

/// Create a bounded FIFO queue pair with the given capacity.
///
/// `capacity` must be positive.
pub fn bounded<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    assert!(capacity > 0, "queue capacity must be positive");
    let (tx, rx) = mpsc::channel(capacity);
    (
        Producer { tx },
        Consumer {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Enqueue half of the queue. Cloneable so any number of concurrent
/// ingestion streams can feed the same queue; global arrival order across
/// producers is their interleaving order.
#[derive(Debug)]
pub struct Producer<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Producer<T> {
    /// Enqueue one item, waiting while the queue is full. Errors only when
    /// the consumer side is gone.
    pub async fn enqueue(&self, item: T) -> Result<(), MockError> {
        self.tx.send(item).await.map_err(|_| MockError::QueueClosed)
    }
}

/// Dequeue half of the queue. Cloneable so each delivery stream can own an
/// independent drain; clones contend for items, they do not duplicate
/// them.
#[derive(Debug)]
pub struct Consumer<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> Consumer<T> {
    /// Dequeue the next item, waiting while the queue is empty. Returns
    /// `None` once every producer is gone and the buffer is drained.
    pub async fn dequeue(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}
