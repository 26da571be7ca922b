//! Emission recalculation service client
//!
//! Given a segment's car distance and a passenger count, the service returns
//! an updated per-trip emission figure. Requests are fire-and-forget from
//! the engine's point of view: no retries, and a response that arrives after
//! the itinerary changed is discarded by the caller at apply time.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::EmissionsConfig;

use super::BridgeError;
use super::types::{BackendErrorBody, RecalcResponse};

/// The external emission recalculation service
#[async_trait]
pub trait EmissionService: Send + Sync {
    /// Recalculate car emissions for one segment at the given occupancy;
    /// returns the new `carbon_kg` value.
    async fn recalculate(&self, segment_index: usize, occupancy: u8, distance_km: f64) -> Result<f64, BridgeError>;
}

/// HTTP client for the emission recalculation endpoint
pub struct EmissionsClient {
    base_url: String,
    http: Client,
}

impl EmissionsClient {
    /// Create a new client from configuration
    pub fn from_config(config: &EmissionsConfig) -> Result<Self, BridgeError> {
        debug!(base_url = %config.base_url, "EmissionsClient::from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(BridgeError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build the request body for the recalculation endpoint
    fn build_request_body(segment_index: usize, occupancy: u8, distance_km: f64) -> serde_json::Value {
        serde_json::json!({
            "segment_index": segment_index,
            "occupancy": occupancy,
            "distance_km": distance_km,
        })
    }
}

#[async_trait]
impl EmissionService for EmissionsClient {
    async fn recalculate(&self, segment_index: usize, occupancy: u8, distance_km: f64) -> Result<f64, BridgeError> {
        debug!(segment_index, occupancy, distance_km, "EmissionsClient::recalculate: called");
        let url = format!("{}/api/recalculate-emissions", self.base_url);
        let body = Self::build_request_body(segment_index, occupancy, distance_km);

        // Single attempt: a superseded recalculation is cheaper to drop than to chase
        let response = self.http.post(url).json(&body).send().await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BackendErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            debug!(status, %message, "EmissionsClient::recalculate: service error");
            return Err(BridgeError::Backend { status, message });
        }

        let recalc: RecalcResponse = response.json().await?;
        debug!(carbon_kg = recalc.carbon_kg, "EmissionsClient::recalculate: success");
        Ok(recalc.carbon_kg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_body() {
        let body = EmissionsClient::build_request_body(0, 4, 500.0);

        assert_eq!(body["segment_index"], 0);
        assert_eq!(body["occupancy"], 4);
        assert_eq!(body["distance_km"], 500.0);
    }
}
