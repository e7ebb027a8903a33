//! # Fleetsync Engine
//!
//! Core synchronization logic for the fleetsync status bridge.
//!
//! This crate provides:
//! - Client traits for the provider and consumer APIs, with reqwest-backed
//!   HTTP implementations and scripted mocks for tests
//! - The status converter (timestamp normalization)
//! - The vehicle mapping and change-detection cache
//! - The sync coordinator (fetch → compare → convert → push per vehicle)
//! - The fixed-interval scheduler
//!
//! ## Architecture
//!
//! Data flows one way per vehicle: provider → coordinator → converter →
//! consumer. The coordinator is the only stateful component; the clients are
//! stateless transport wrappers around the two REST APIs.
//!
//! ## Key invariants
//!
//! - A vehicle whose (status, latitude, longitude) triple is unchanged since
//!   the last push is never pushed again
//! - One vehicle's failure never affects the rest of the pass
//! - Exactly one pass runs at a time; passes never overlap

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod convert;
mod coordinator;
mod error;
mod http;
mod mapping;
mod scheduler;

pub use client::{ConsumerClient, MockConsumer, MockProvider, ProviderClient};
pub use convert::convert;
pub use coordinator::{SyncCoordinator, SyncPassResult, SyncStats};
pub use error::{SyncError, SyncResult};
pub use http::{HttpConsumerClient, HttpProviderClient};
pub use mapping::VehicleMapping;
pub use scheduler::{Scheduler, StopHandle, MIN_SYNC_INTERVAL};
