//! PiperCI Core
//!
//! Core types shared by the PiperCI client libraries.
//!
//! This crate contains:
//! - Domain types: records owned by the GMan and ArtMan services (Task, TaskEvent, Artifact, etc.)
//! - DTOs: request bodies sent to those services

pub mod domain;
pub mod dto;
