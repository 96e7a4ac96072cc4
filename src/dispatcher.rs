//! Alert Dispatcher
//!
//! Turns one event into one Opsgenie alert. Every failure after the event
//! has been accepted is logged and reported as an outcome, never returned
//! as an error, so a bad event cannot stall the stream.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::adapters::AlertApiClient;
use crate::domain::{build_tags, AlertPriority, AlertRequest, ApiResponse, LogEvent, PropertyValue};
use crate::error::{RelayError, Result};
use crate::profile::AlertProfile;
use crate::template::MessageContext;

/// Point in the dispatch a record was emitted at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStage {
    /// About to submit
    Intent,
    /// Accepted by the API
    Delivered,
    /// Rendering or submission failed
    Failed,
}

impl AlertStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStage::Intent => "intent",
            AlertStage::Delivered => "delivered",
            AlertStage::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AlertStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic record carrying the alert details for correlation
#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub stage: AlertStage,
    pub event_id: String,
    pub message: Option<String>,
    pub description: Option<String>,
    pub priority: AlertPriority,
    pub responders: String,
    pub tags: Vec<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered(ApiResponse),
    Failed { status: Option<u16>, error: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered(_))
    }
}

#[derive(Default)]
struct Rendered {
    message: Option<String>,
    description: Option<String>,
}

/// Per-event alert orchestrator
pub struct AlertDispatcher {
    profile: Arc<AlertProfile>,
    client: Arc<dyn AlertApiClient>,
    event_tx: broadcast::Sender<AlertRecord>,
}

impl AlertDispatcher {
    pub fn new(profile: Arc<AlertProfile>, client: Arc<dyn AlertApiClient>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            profile,
            client,
            event_tx,
        }
    }

    pub fn profile(&self) -> &AlertProfile {
        &self.profile
    }

    /// Subscribe to diagnostic records
    pub fn subscribe(&self) -> broadcast::Receiver<AlertRecord> {
        self.event_tx.subscribe()
    }

    /// Handle one event.
    ///
    /// Only a missing event is an error; everything else is reported
    /// through the returned outcome and the diagnostic records.
    pub async fn handle(&self, event: Option<&LogEvent>) -> Result<DispatchOutcome> {
        let event = event.ok_or(RelayError::MissingEvent)?;

        let tags = build_tags(&self.profile.static_tags, self.event_tags(event));
        let mut rendered = Rendered::default();

        match self.submit(event, &tags, &mut rendered).await {
            Ok(response) => {
                self.record(
                    AlertStage::Delivered,
                    event,
                    &rendered,
                    &tags,
                    Some(response.status),
                    None,
                );
                Ok(DispatchOutcome::Delivered(response))
            }
            Err(err) => {
                let status = match &err {
                    RelayError::ApiStatus { status, .. } => Some(*status),
                    _ => None,
                };
                let detail = err.to_string();
                self.record(
                    AlertStage::Failed,
                    event,
                    &rendered,
                    &tags,
                    status,
                    Some(detail.clone()),
                );
                Ok(DispatchOutcome::Failed {
                    status,
                    error: detail,
                })
            }
        }
    }

    fn event_tags<'e>(&self, event: &'e LogEvent) -> Option<&'e PropertyValue> {
        if self.profile.include_event_tags {
            event.property(&self.profile.event_tag_property)
        } else {
            None
        }
    }

    async fn submit(
        &self,
        event: &LogEvent,
        tags: &[String],
        rendered: &mut Rendered,
    ) -> Result<ApiResponse> {
        let profile = &*self.profile;
        let ctx = MessageContext::new(event, &profile.host);

        let message = profile.templates.render_message(&ctx)?;
        rendered.message = Some(message.clone());
        let description = profile.templates.render_description(&ctx)?;
        rendered.description = Some(description.clone());

        self.record(AlertStage::Intent, event, rendered, tags, None, None);

        let mut request = AlertRequest::new(
            message,
            event.id.clone(),
            description,
            profile.priority,
            profile.host.base_uri.clone(),
            tags.to_vec(),
        );
        if profile.has_responders() {
            request = request.with_responders(profile.responders.clone());
        }

        let payload = serde_json::to_string(&request)?;
        debug!(%payload, "Opsgenie API call");

        let response = self.client.create(&request).await?;
        if !response.is_success() {
            return Err(RelayError::ApiStatus {
                status: response.status,
                body: String::new(),
            });
        }
        Ok(response)
    }

    fn record(
        &self,
        stage: AlertStage,
        event: &LogEvent,
        rendered: &Rendered,
        tags: &[String],
        status: Option<u16>,
        error: Option<String>,
    ) {
        let record = AlertRecord {
            stage,
            event_id: event.id.clone(),
            message: rendered.message.clone(),
            description: rendered.description.clone(),
            priority: self.profile.priority,
            responders: self.profile.responder_summary.clone(),
            tags: tags.to_vec(),
            status,
            error,
            timestamp: Utc::now(),
        };

        let message = record.message.as_deref().unwrap_or("<unrendered>");
        let description = record.description.as_deref().unwrap_or("<unrendered>");
        match stage {
            AlertStage::Intent => debug!(
                event_id = %record.event_id,
                alert_message = message,
                alert_description = description,
                priority = %record.priority,
                responders = %record.responders,
                tags = ?record.tags,
                "Send alert to Opsgenie"
            ),
            AlertStage::Delivered => info!(
                event_id = %record.event_id,
                status = ?record.status,
                alert_message = message,
                alert_description = description,
                priority = %record.priority,
                responders = %record.responders,
                tags = ?record.tags,
                "Opsgenie result"
            ),
            AlertStage::Failed => error!(
                event_id = %record.event_id,
                status = ?record.status,
                error = record.error.as_deref().unwrap_or_default(),
                alert_message = message,
                alert_description = description,
                priority = %record.priority,
                responders = %record.responders,
                tags = ?record.tags,
                "Opsgenie alert failed"
            ),
        }

        // No subscribers is fine
        let _ = self.event_tx.send(record);
    }
}
