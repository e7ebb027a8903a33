//! Client abstractions for the two fleet-status APIs.
//!
//! The coordinator only ever talks to these traits. The HTTP
//! implementations live in [`crate::http`]; the mocks here let tests script
//! both sides of the bridge without a network.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use fleetsync_protocol::{StatusReport, VehicleStatus};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Read side of the bridge: the system of record for vehicle status.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Fetches the current status of one vehicle.
    async fn fetch_status(&self, vehicle_id: &str) -> SyncResult<VehicleStatus>;
}

/// Write side of the bridge: the system consuming status updates.
#[async_trait]
pub trait ConsumerClient: Send + Sync {
    /// Pushes a converted status for one vehicle.
    async fn push_status(&self, vehicle_id: &str, report: &StatusReport) -> SyncResult<()>;
}

#[async_trait]
impl<T: ProviderClient + ?Sized> ProviderClient for Arc<T> {
    async fn fetch_status(&self, vehicle_id: &str) -> SyncResult<VehicleStatus> {
        (**self).fetch_status(vehicle_id).await
    }
}

#[async_trait]
impl<T: ConsumerClient + ?Sized> ConsumerClient for Arc<T> {
    async fn push_status(&self, vehicle_id: &str, report: &StatusReport) -> SyncResult<()> {
        (**self).push_status(vehicle_id, report).await
    }
}

/// A scripted provider for tests.
///
/// Returns whatever status was last set per vehicle id; vehicles marked as
/// failing answer with a fetch error instead.
#[derive(Debug, Default)]
pub struct MockProvider {
    statuses: Mutex<HashMap<String, VehicleStatus>>,
    failing: Mutex<HashSet<String>>,
    fetches: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Creates an empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status returned for a vehicle.
    pub fn set_status(&self, vehicle_id: impl Into<String>, status: VehicleStatus) {
        self.statuses.lock().insert(vehicle_id.into(), status);
    }

    /// Marks a vehicle as failing (or clears the mark).
    pub fn set_failing(&self, vehicle_id: impl Into<String>, failing: bool) {
        let vehicle_id = vehicle_id.into();
        if failing {
            self.failing.lock().insert(vehicle_id);
        } else {
            self.failing.lock().remove(&vehicle_id);
        }
    }

    /// Vehicle ids fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    async fn fetch_status(&self, vehicle_id: &str) -> SyncResult<VehicleStatus> {
        self.fetches.lock().push(vehicle_id.to_string());

        if self.failing.lock().contains(vehicle_id) {
            return Err(SyncError::ProviderFetch {
                vehicle_id: vehicle_id.to_string(),
                status_code: 503,
            });
        }

        self.statuses
            .lock()
            .get(vehicle_id)
            .cloned()
            .ok_or_else(|| SyncError::ProviderFetch {
                vehicle_id: vehicle_id.to_string(),
                status_code: 404,
            })
    }
}

/// A recording consumer for tests.
///
/// Accepts every push and records it; vehicles marked as failing answer with
/// a push error instead (the push is still recorded as attempted).
#[derive(Debug, Default)]
pub struct MockConsumer {
    pushes: Mutex<Vec<(String, StatusReport)>>,
    failing: Mutex<HashSet<String>>,
}

impl MockConsumer {
    /// Creates an empty mock consumer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a vehicle as failing (or clears the mark).
    pub fn set_failing(&self, vehicle_id: impl Into<String>, failing: bool) {
        let vehicle_id = vehicle_id.into();
        if failing {
            self.failing.lock().insert(vehicle_id);
        } else {
            self.failing.lock().remove(&vehicle_id);
        }
    }

    /// All pushes attempted so far, in call order.
    pub fn pushes(&self) -> Vec<(String, StatusReport)> {
        self.pushes.lock().clone()
    }

    /// Number of pushes attempted so far.
    pub fn push_count(&self) -> usize {
        self.pushes.lock().len()
    }
}

#[async_trait]
impl ConsumerClient for MockConsumer {
    async fn push_status(&self, vehicle_id: &str, report: &StatusReport) -> SyncResult<()> {
        self.pushes
            .lock()
            .push((vehicle_id.to_string(), report.clone()));

        if self.failing.lock().contains(vehicle_id) {
            return Err(SyncError::ConsumerPush {
                vehicle_id: vehicle_id.to_string(),
                status_code: 500,
                body: "mock failure".to_string(),
            });
        }

        Ok(())
    }
}
