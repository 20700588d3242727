//! Shared HTTP client for external services
//!
//! Every call is bounded by a timeout and attempted exactly once.

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    /// GET `url` and decode the JSON body, using the default timeout
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
    ) -> std::result::Result<T, UpstreamError> {
        self.get_json_with_timeout(service, url, self.timeout).await
    }

    /// GET `url` and decode the JSON body within `timeout`
    pub async fn get_json_with_timeout<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<T, UpstreamError> {
        debug!(service, url, "Calling upstream");
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(service, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(service, status = status.as_u16(), "Upstream returned an error status");
            return Err(UpstreamError::Status {
                service,
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(service, e))?;

        debug!(
            service,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream call succeeded"
        );
        Ok(body)
    }
}
