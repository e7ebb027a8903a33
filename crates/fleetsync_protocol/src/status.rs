//! Status payload read from the provider API.

use crate::snapshot::StatusSnapshot;
use serde::Deserialize;

/// A vehicle status as reported by the provider.
///
/// Only the fields the bridge acts on are modeled here; provider responses
/// carry additional fields (status id, status note, ...) which are ignored
/// during deserialization. All four fields are required — a response missing
/// any of them does not parse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleStatus {
    /// Operational status code.
    pub status: i64,
    /// Latitude of the last known position, decimal degrees.
    pub lat: f64,
    /// Longitude of the last known position, decimal degrees.
    pub lng: f64,
    /// Epoch seconds (UTC) of the last status change.
    pub status_ts: i64,
}

impl VehicleStatus {
    /// Returns the change-detection triple for this status.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            status: self.status,
            latitude: self.lat,
            longitude: self.lng,
        }
    }
}
