//! gRPC service implementations.

mod delivery;
mod endorsement;
mod ordering;

pub use delivery::DeliveryServiceImpl;
pub use endorsement::EndorsementServiceImpl;
pub use ordering::OrderingServiceImpl;
