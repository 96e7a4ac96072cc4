//! Attachment lifecycle
//!
//! `attach` normalizes the settings and acquires the API client; `detach`
//! (or drop) releases it.

use std::sync::Arc;
use tracing::{debug, info};

use crate::adapters::{AlertApiClient, OpsgenieClient};
use crate::config::AppConfig;
use crate::dispatcher::{AlertDispatcher, DispatchOutcome};
use crate::domain::LogEvent;
use crate::error::Result;
use crate::profile::AlertProfile;
use crate::template::HostInfo;

/// An attached relay instance
pub struct AlertApp {
    dispatcher: Arc<AlertDispatcher>,
}

impl AlertApp {
    /// Attach with the production Opsgenie client
    pub fn attach(config: &AppConfig) -> Result<Self> {
        let client = OpsgenieClient::from_config(&config.alert.api_key, &config.api)?;
        Self::attach_with_client(config, Arc::new(client))
    }

    /// Attach with a substitute client
    pub fn attach_with_client(config: &AppConfig, client: Arc<dyn AlertApiClient>) -> Result<Self> {
        let host = HostInfo::new(config.host.name.clone(), config.host.base_uri.clone());
        let profile = AlertProfile::from_settings(&config.alert, host)?;

        info!(
            priority = %profile.priority,
            responders = %profile.responder_summary,
            tags = ?profile.static_tags,
            include_event_tags = profile.include_event_tags,
            event_tag_property = %profile.event_tag_property,
            "Opsgenie relay attached"
        );

        Ok(Self {
            dispatcher: Arc::new(AlertDispatcher::new(Arc::new(profile), client)),
        })
    }

    /// Shared handle for concurrent dispatch
    pub fn dispatcher(&self) -> Arc<AlertDispatcher> {
        self.dispatcher.clone()
    }

    pub fn profile(&self) -> &AlertProfile {
        self.dispatcher.profile()
    }

    pub async fn on_event(&self, event: Option<&LogEvent>) -> Result<DispatchOutcome> {
        self.dispatcher.handle(event).await
    }

    /// Release the API client
    ///
    /// Tasks still holding a dispatcher handle keep the client alive until
    /// they finish.
    pub fn detach(self) {}
}

impl Drop for AlertApp {
    fn drop(&mut self) {
        let outstanding = Arc::strong_count(&self.dispatcher) - 1;
        if outstanding > 0 {
            debug!(outstanding, "Dispatcher still referenced by in-flight tasks");
        }
        info!("Opsgenie relay detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAlertApiClient;
    use crate::domain::ApiResponse;
    use crate::error::RelayError;

    fn config() -> AppConfig {
        serde_json::from_str("{}").unwrap()
    }

    #[test]
    fn attach_without_api_key_fails() {
        assert!(matches!(
            AlertApp::attach(&config()),
            Err(RelayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn injected_client_skips_api_key_check() {
        let app = AlertApp::attach_with_client(&config(), Arc::new(MockAlertApiClient::new())).unwrap();
        assert_eq!(app.profile().event_tag_property, "Tags");
        app.detach();
    }

    #[test]
    fn detach_releases_the_client() {
        let client: Arc<dyn AlertApiClient> = Arc::new(MockAlertApiClient::new());
        let app = AlertApp::attach_with_client(&config(), client.clone()).unwrap();
        assert_eq!(Arc::strong_count(&client), 2);
        app.detach();
        assert_eq!(Arc::strong_count(&client), 1);
    }

    #[test]
    fn drop_releases_the_client() {
        let client: Arc<dyn AlertApiClient> = Arc::new(MockAlertApiClient::new());
        {
            let _app = AlertApp::attach_with_client(&config(), client.clone()).unwrap();
        }
        assert_eq!(Arc::strong_count(&client), 1);
    }

    #[test]
    fn outstanding_handle_outlives_detach() {
        let client: Arc<dyn AlertApiClient> = Arc::new(MockAlertApiClient::new());
        let app = AlertApp::attach_with_client(&config(), client.clone()).unwrap();
        let dispatcher = app.dispatcher();
        app.detach();
        assert_eq!(Arc::strong_count(&client), 2);
        drop(dispatcher);
        assert_eq!(Arc::strong_count(&client), 1);
    }

    #[test]
    fn on_event_dispatches() {
        let mut client = MockAlertApiClient::new();
        client
            .expect_create()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(202)));
        let app = AlertApp::attach_with_client(&config(), Arc::new(client)).unwrap();

        let outcome = tokio_test::block_on(app.on_event(Some(&LogEvent::new("e1", "hi")))).unwrap();
        assert!(outcome.is_delivered());
    }
}
