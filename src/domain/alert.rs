use serde::{Deserialize, Serialize};

use super::priority::AlertPriority;
use super::responder::Responder;

/// Body of an Opsgenie create-alert request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub message: String,
    /// Event id, so repeated deliveries of one event collapse to one alert
    pub alias: String,
    pub description: String,
    pub priority: AlertPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responders: Option<Vec<Responder>>,
    pub source: String,
    pub tags: Vec<String>,
}

impl AlertRequest {
    /// Plain alert, routed by Opsgenie's own rules
    pub fn new(
        message: String,
        alias: String,
        description: String,
        priority: AlertPriority,
        source: String,
        tags: Vec<String>,
    ) -> Self {
        Self {
            message,
            alias,
            description,
            priority,
            responders: None,
            source,
            tags,
        }
    }

    /// Alert addressed to explicit responders
    pub fn with_responders(mut self, responders: Vec<Responder>) -> Self {
        self.responders = Some(responders);
        self
    }

    pub fn has_responders(&self) -> bool {
        self.responders.is_some()
    }
}

/// Response from the alerting API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub request_id: Option<String>,
}

impl ApiResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            request_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
