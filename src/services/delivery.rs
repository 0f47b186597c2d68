//! Filtered-block delivery service: handshake, ack, then the drain loop.

use slog::Logger;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};

use crate::cutter::BlockCutter;
use crate::error::MockError;
use crate::proto::delivery_service_server::DeliveryService;
use crate::proto::{
    AckStatus, DeliverResponse, Envelope, FilteredBlock, FilteredTransaction, deliver_response,
};
use crate::queue::{Consumer, Submission};

/// Implementation of the DeliveryService gRPC service.
///
/// A subscription opens with exactly one envelope from the client (its
/// content is ignored) and is acknowledged with a success status. The
/// stream then drains the shared transaction queue, emitting one filtered
/// block every `block_size` drained transactions until the queue closes or
/// the subscriber goes away.
pub struct DeliveryServiceImpl {
    consumer: Consumer<Submission>,
    block_size: u64,
    logger: Logger,
}

impl DeliveryServiceImpl {
    /// Create a new DeliveryService implementation draining the given queue.
    pub fn new(consumer: Consumer<Submission>, block_size: u64, logger: Logger) -> Self {
        Self {
            consumer,
            block_size,
            logger,
        }
    }
}

#[tonic::async_trait]
impl DeliveryService for DeliveryServiceImpl {
    type DeliverFilteredStream = ReceiverStream<Result<DeliverResponse, Status>>;

    async fn deliver_filtered(
        &self,
        request: Request<Streaming<Envelope>>,
    ) -> Result<Response<Self::DeliverFilteredStream>, Status> {
        let mut inbound = request.into_inner();

        // One handshake envelope opens the subscription. A failed receive
        // ends this stream only; the queue and other streams are
        // unaffected.
        match inbound.message().await {
            Ok(Some(_seek)) => {}
            Ok(None) => {
                return Err(Status::invalid_argument(
                    "delivery stream closed before handshake",
                ));
            }
            Err(status) => {
                slog::warn!(self.logger, "delivery handshake failed"; "error" => %status);
                return Err(status);
            }
        }

        let consumer = self.consumer.clone();
        let block_size = self.block_size;
        let logger = self.logger.clone();
        let (outbound, stream) = mpsc::channel(16);

        tokio::spawn(async move {
            let ack = DeliverResponse {
                kind: Some(deliver_response::Kind::Status(AckStatus::Success as i32)),
            };
            if outbound.send(Ok(ack)).await.is_err() {
                return;
            }

            let mut cutter = BlockCutter::new(block_size);
            while let Some(_submission) = consumer.dequeue().await {
                if let Some(cut) = cutter.observe() {
                    let block = FilteredBlock {
                        number: cut.number,
                        filtered_transactions: (0..cut.transactions)
                            .map(|_| FilteredTransaction::default())
                            .collect(),
                    };
                    let notification = DeliverResponse {
                        kind: Some(deliver_response::Kind::FilteredBlock(block)),
                    };
                    if outbound.send(Ok(notification)).await.is_err() {
                        slog::debug!(logger, "delivery subscriber disconnected";
                            "drained" => cutter.drained(),
                            "blocks" => cutter.blocks_cut(),
                        );
                        return;
                    }
                }
            }
            slog::info!(logger, "transaction queue closed, ending delivery";
                "drained" => cutter.drained(),
                "blocks" => cutter.blocks_cut(),
            );
        });

        Ok(Response::new(ReceiverStream::new(stream)))
    }

    type DeliverStream = ReceiverStream<Result<DeliverResponse, Status>>;

    async fn deliver(
        &self,
        _request: Request<Streaming<Envelope>>,
    ) -> Result<Response<Self::DeliverStream>, Status> {
        Err(MockError::Unsupported("full block delivery").into())
    }

    type DeliverWithPrivateDataStream = ReceiverStream<Result<DeliverResponse, Status>>;

    async fn deliver_with_private_data(
        &self,
        _request: Request<Streaming<Envelope>>,
    ) -> Result<Response<Self::DeliverWithPrivateDataStream>, Status> {
        Err(MockError::Unsupported("private-data delivery").into())
    }
}
