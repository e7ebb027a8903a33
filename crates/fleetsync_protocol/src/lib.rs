//! # Fleetsync Protocol
//!
//! Wire types for the fleetsync status bridge.
//!
//! This crate provides:
//! - [`VehicleStatus`], the status payload read from the provider API
//! - [`StatusReport`] and [`Position`], the payload written to the consumer API
//! - [`StatusSnapshot`], the change-detection triple kept by the coordinator
//!
//! This is a pure data crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod report;
mod snapshot;
mod status;

pub use report::{Position, StatusReport};
pub use snapshot::StatusSnapshot;
pub use status::VehicleStatus;
