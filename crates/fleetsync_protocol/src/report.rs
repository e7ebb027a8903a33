//! Status payload written to the consumer API.

use serde::Serialize;

/// A GPS position in the consumer wire format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// A vehicle status report in the consumer wire format.
///
/// Serializes to the PascalCase JSON body the consumer write endpoint
/// expects. Timestamps are RFC 3339 strings carrying the local UTC offset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusReport {
    /// Operational status code, copied verbatim from the provider.
    pub status: i64,
    /// Last known position.
    pub position: Position,
    /// When the status last changed.
    pub status_timestamp: String,
    /// When the position was reported.
    pub position_timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_consumer_shape() {
        let report = StatusReport {
            status: 3,
            position: Position {
                latitude: 51.5,
                longitude: 7.25,
            },
            status_timestamp: "2024-01-01T12:00:00+01:00".to_string(),
            position_timestamp: "2024-01-01T12:34:56+01:00".to_string(),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "Status": 3,
                "Position": {
                    "Latitude": 51.5,
                    "Longitude": 7.25
                },
                "StatusTimestamp": "2024-01-01T12:00:00+01:00",
                "PositionTimestamp": "2024-01-01T12:34:56+01:00"
            })
        );
    }
}
