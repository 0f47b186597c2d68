//! Proposal endorsement stub.

use tonic::{Request, Response, Status};

use crate::proto::endorsement_service_server::EndorsementService;
use crate::proto::{ProposalResponse, SignedProposal};

/// Implementation of the EndorsementService gRPC service.
///
/// Models a no-op validation step: every proposal is endorsed with a fixed
/// success status, uninspected. There is no failure path.
#[derive(Default)]
pub struct EndorsementServiceImpl;

impl EndorsementServiceImpl {
    pub fn new() -> Self {
        Self
    }
}

#[tonic::async_trait]
impl EndorsementService for EndorsementServiceImpl {
    async fn process_proposal(
        &self,
        _request: Request<SignedProposal>,
    ) -> Result<Response<ProposalResponse>, Status> {
        Ok(Response::new(ProposalResponse {
            status: 200,
            message: String::new(),
            payload: Vec::new(),
        }))
    }
}
