//! Error types for the status bridge.

use thiserror::Error;

/// Result type for bridge operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while bridging vehicle status.
///
/// Configuration errors are fatal and abort startup. Everything else is
/// scoped to a single vehicle within a pass and is caught, logged, and
/// dropped at the coordinator's per-vehicle boundary.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid or inconsistent configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider answered a status read with a non-success response.
    #[error("provider returned status {status_code} for vehicle '{vehicle_id}'")]
    ProviderFetch {
        /// Provider-side vehicle id.
        vehicle_id: String,
        /// HTTP status code of the response.
        status_code: u16,
    },

    /// The provider response body was missing or malformed.
    #[error("unparsable provider response for vehicle '{vehicle_id}': {detail}")]
    ProviderParse {
        /// Provider-side vehicle id.
        vehicle_id: String,
        /// Parse failure detail.
        detail: String,
    },

    /// The consumer rejected a status write.
    #[error("consumer returned status {status_code} for vehicle '{vehicle_id}': {body}")]
    ConsumerPush {
        /// Consumer-side vehicle id.
        vehicle_id: String,
        /// HTTP status code of the response.
        status_code: u16,
        /// Response body, surfaced for diagnostics.
        body: String,
    },

    /// Network-level failure before an HTTP status was available.
    #[error("transport error for vehicle '{vehicle_id}': {message}")]
    Transport {
        /// Vehicle id the request was scoped to.
        vehicle_id: String,
        /// Underlying error message.
        message: String,
    },
}

impl SyncError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a transport error scoped to one vehicle.
    pub fn transport(vehicle_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            vehicle_id: vehicle_id.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error must abort startup instead of being
    /// absorbed at the per-vehicle boundary.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Configuration(_))
    }
}
