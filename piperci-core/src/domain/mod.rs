//! Core domain types
//!
//! These types mirror the records held by the remote services. The client
//! never holds authoritative state: every value here is a snapshot of what
//! GMan or ArtMan returned for a single request.

pub mod artifact;
pub mod task;
pub mod thread;
