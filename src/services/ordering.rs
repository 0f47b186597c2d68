//! Transaction ingestion service: one ack per submitted envelope.

use slog::Logger;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};

use crate::error::MockError;
use crate::proto::ordering_service_server::OrderingService;
use crate::proto::{AckStatus, BroadcastResponse, DeliverResponse, Envelope};
use crate::queue::{Producer, Submission};

/// Implementation of the OrderingService gRPC service.
///
/// Every inbound envelope is enqueued onto the shared transaction queue
/// (waiting while the queue is full) and then acknowledged on the same
/// stream, so an ack is never observable before its transaction is queued.
pub struct OrderingServiceImpl {
    producer: Producer<Submission>,
    logger: Logger,
}

impl OrderingServiceImpl {
    /// Create a new OrderingService implementation feeding the given queue.
    pub fn new(producer: Producer<Submission>, logger: Logger) -> Self {
        Self { producer, logger }
    }
}

#[tonic::async_trait]
impl OrderingService for OrderingServiceImpl {
    type BroadcastStream = ReceiverStream<Result<BroadcastResponse, Status>>;

    async fn broadcast(
        &self,
        request: Request<Streaming<Envelope>>,
    ) -> Result<Response<Self::BroadcastStream>, Status> {
        let mut inbound = request.into_inner();
        let producer = self.producer.clone();
        let logger = self.logger.clone();

        // Depth 1: the ack for envelope k is handed off before envelope
        // k+1 is read.
        let (acks, outbound) = mpsc::channel(1);

        tokio::spawn(async move {
            loop {
                match inbound.message().await {
                    // Client half-closed its send direction: clean end.
                    Ok(None) => break,
                    Ok(Some(_envelope)) => {
                        if let Err(err) = producer.enqueue(Submission).await {
                            let _ = acks.send(Err(Status::from(err))).await;
                            break;
                        }
                        let ack = BroadcastResponse {
                            status: AckStatus::Success as i32,
                            info: String::new(),
                        };
                        if acks.send(Ok(ack)).await.is_err() {
                            // Caller stopped reading acks; nothing left to do.
                            break;
                        }
                    }
                    Err(status) => {
                        // Terminal for this stream only; the queue and
                        // other streams are unaffected.
                        slog::warn!(logger, "broadcast stream read failed"; "error" => %status);
                        let _ = acks.send(Err(status)).await;
                        break;
                    }
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(outbound)))
    }

    type DeliverStream = ReceiverStream<Result<DeliverResponse, Status>>;

    async fn deliver(
        &self,
        _request: Request<Streaming<Envelope>>,
    ) -> Result<Response<Self::DeliverStream>, Status> {
        Err(MockError::Unsupported("ordering block delivery").into())
    }
}
