//! Application layer for econet-client.

pub mod correlator;

pub use correlator::PendingRequests;
