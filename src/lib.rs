pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod profile;
pub mod relay;
pub mod template;

pub use adapters::{AlertApiClient, OpsgenieClient};
pub use app::AlertApp;
pub use config::{AlertSettings, AppConfig, SecretString};
pub use dispatcher::{AlertDispatcher, AlertRecord, AlertStage, DispatchOutcome};
pub use domain::{
    AlertPriority, AlertRequest, ApiResponse, LogEvent, PropertyValue, Responder, ResponderType,
};
pub use error::{RelayError, Result};
pub use profile::AlertProfile;
pub use relay::{relay_events, RelayStats};
pub use template::{AlertTemplates, HostInfo, MessageContext};
