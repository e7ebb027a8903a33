//! Converts provider status payloads into consumer reports.

use chrono::{DateTime, Local, TimeZone, Utc};
use fleetsync_protocol::{Position, StatusReport, VehicleStatus};

/// Builds the consumer report for a fetched vehicle status.
///
/// Status code and position are copied verbatim. The status timestamp is the
/// provider's epoch timestamp interpreted as UTC and rendered in the local
/// system offset; the position timestamp is the wall clock at conversion
/// time, rendered the same way.
pub fn convert(status: &VehicleStatus) -> StatusReport {
    StatusReport {
        status: status.status,
        position: Position {
            latitude: status.lat,
            longitude: status.lng,
        },
        status_timestamp: status_timestamp(status.status_ts),
        position_timestamp: Local::now().to_rfc3339(),
    }
}

/// Renders provider epoch seconds as a local-offset RFC 3339 string.
///
/// Epoch values outside chrono's representable range clamp to the Unix
/// epoch; conversion itself never fails.
fn status_timestamp(epoch_secs: i64) -> String {
    let utc = Utc
        .timestamp_opt(epoch_secs, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);
    utc.with_timezone(&Local).to_rfc3339()
}
