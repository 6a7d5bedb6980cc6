//! beacon-core: Core types for the beacon registry client
//!
//! This crate provides the fundamental types used throughout beacon:
//! - The Eureka wire data model (instance descriptor, application
//!   snapshots, response envelope)
//! - Instance status values
//! - The shared cursor-rotation helper
//! - Configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod model;
pub mod rotation;

pub use config::*;
pub use error::*;
pub use model::*;
