//! HTTP implementations of the provider and consumer clients.
//!
//! Both clients are thin reqwest wrappers: build the request, map a
//! non-success response or a network failure into the matching
//! [`SyncError`], and hand the payload on. Retry policy lives with the
//! scheduler's next cycle, not here.

use crate::client::{ConsumerClient, ProviderClient};
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use fleetsync_protocol::{StatusReport, VehicleStatus};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client() -> SyncResult<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| SyncError::configuration(format!("failed to build HTTP client: {e}")))
}

/// Strips trailing slashes so endpoint paths can be appended uniformly.
fn normalize_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

/// Client for the provider's authenticated read endpoint.
///
/// Issues `GET {base}/api/v2/using-vehicles/get-status/{id}` with the access
/// key as the `accesskey` query parameter.
pub struct HttpProviderClient {
    base_url: String,
    access_key: String,
    client: Client,
}

impl HttpProviderClient {
    /// Creates a provider client for the given base URL and access key.
    pub fn new(base_url: impl Into<String>, access_key: impl Into<String>) -> SyncResult<Self> {
        Ok(Self {
            base_url: normalize_base(base_url.into()),
            access_key: access_key.into(),
            client: build_client()?,
        })
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn fetch_status(&self, vehicle_id: &str) -> SyncResult<VehicleStatus> {
        let url = format!(
            "{}/api/v2/using-vehicles/get-status/{}",
            self.base_url, vehicle_id
        );

        let response = self
            .client
            .get(&url)
            .query(&[("accesskey", self.access_key.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SyncError::transport(vehicle_id, e.to_string()))?;

        let status_code = response.status();
        if !status_code.is_success() {
            return Err(SyncError::ProviderFetch {
                vehicle_id: vehicle_id.to_string(),
                status_code: status_code.as_u16(),
            });
        }

        response
            .json::<VehicleStatus>()
            .await
            .map_err(|e| SyncError::ProviderParse {
                vehicle_id: vehicle_id.to_string(),
                detail: e.to_string(),
            })
    }
}

/// Client for the consumer's authenticated write endpoint.
///
/// Issues `POST {base}/interfaces/public/vehicle/{id}/status` with a bearer
/// token and the JSON report body. On a non-success response the body text
/// is carried in the error for diagnostics, whatever its shape.
pub struct HttpConsumerClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpConsumerClient {
    /// Creates a consumer client for the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> SyncResult<Self> {
        Ok(Self {
            base_url: normalize_base(base_url.into()),
            api_key: api_key.into(),
            client: build_client()?,
        })
    }
}

#[async_trait]
impl ConsumerClient for HttpConsumerClient {
    async fn push_status(&self, vehicle_id: &str, report: &StatusReport) -> SyncResult<()> {
        let url = format!(
            "{}/interfaces/public/vehicle/{}/status",
            self.base_url, vehicle_id
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json")
            .json(report)
            .send()
            .await
            .map_err(|e| SyncError::transport(vehicle_id, e.to_string()))?;

        let status_code = response.status();
        if status_code.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::ConsumerPush {
            vehicle_id: vehicle_id.to_string(),
            status_code: status_code.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slashes_are_stripped() {
        assert_eq!(
            normalize_base("https://provider.example.com/".into()),
            "https://provider.example.com"
        );
        assert_eq!(
            normalize_base("https://provider.example.com//".into()),
            "https://provider.example.com"
        );
        assert_eq!(
            normalize_base("https://provider.example.com".into()),
            "https://provider.example.com"
        );
    }

    #[test]
    fn clients_build_with_plain_base_urls() {
        assert!(HttpProviderClient::new("https://provider.example.com", "key").is_ok());
        assert!(HttpConsumerClient::new("https://consumer.example.com/", "token").is_ok());
    }
}
