//! Opsgenie Alert API client
//!
//! Creates alerts through `POST /v2/alerts`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::traits::AlertApiClient;
use crate::config::{ApiConfig, SecretString};
use crate::domain::{AlertRequest, ApiResponse};
use crate::error::{RelayError, Result};

pub const DEFAULT_OPSGENIE_API_BASE: &str = "https://api.opsgenie.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAlertResponse {
    #[serde(default)]
    request_id: Option<String>,
}

/// HTTP-backed Opsgenie client
#[derive(Clone)]
pub struct OpsgenieClient {
    http: Client,
    alerts_url: String,
}

impl OpsgenieClient {
    pub fn new(api_key: &SecretString, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(RelayError::InvalidConfig(
                "an Opsgenie API key is required".to_string(),
            ));
        }

        let base_url = base_url
            .unwrap_or(DEFAULT_OPSGENIE_API_BASE)
            .trim_end_matches('/');
        url::Url::parse(base_url).map_err(|e| {
            RelayError::InvalidConfig(format!("invalid Opsgenie base URL '{}': {}", base_url, e))
        })?;

        let mut auth = HeaderValue::from_str(&format!("GenieKey {}", api_key.expose().trim()))
            .map_err(|_| {
                RelayError::InvalidConfig("API key contains invalid header characters".to_string())
            })?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(concat!("opsgenie-relay/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            alerts_url: format!("{}/v2/alerts", base_url),
        })
    }

    pub fn from_config(api_key: &SecretString, api: &ApiConfig) -> Result<Self> {
        Self::new(
            api_key,
            Some(&api.base_url),
            Duration::from_secs(api.timeout_secs),
        )
    }

    pub fn alerts_url(&self) -> &str {
        &self.alerts_url
    }
}

#[async_trait]
impl AlertApiClient for OpsgenieClient {
    async fn create(&self, request: &AlertRequest) -> Result<ApiResponse> {
        let resp = self.http.post(&self.alerts_url).json(request).send().await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(RelayError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let request_id = serde_json::from_str::<CreateAlertResponse>(&body)
            .ok()
            .and_then(|r| r.request_id);
        debug!(status = status.as_u16(), request_id = ?request_id, "Opsgenie accepted alert");

        Ok(ApiResponse {
            status: status.as_u16(),
            request_id,
        })
    }
}
