//! Data Transfer Objects
//!
//! Request bodies sent to the GMan and ArtMan services.

pub mod artifact;
pub mod task;
