use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use zeroize::Zeroize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub alert: AlertSettings,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Operator-facing alert settings, as supplied by the host
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertSettings {
    /// Opsgenie API key
    #[serde(default)]
    pub api_key: SecretString,
    /// Handlebars template for the alert message; the event message when blank
    #[serde(default)]
    pub alert_message: Option<String>,
    /// Handlebars template for the alert description
    #[serde(default)]
    pub alert_description: Option<String>,
    /// P1..P5, defaults to P3
    #[serde(default)]
    pub event_priority: Option<String>,
    /// Comma-delimited `name` or `name=[team|user|escalation|schedule]`
    #[serde(default)]
    pub responders: Option<String>,
    /// Comma-delimited static tags
    #[serde(default)]
    pub tags: Option<String>,
    /// Append tags read from an event property
    #[serde(default)]
    pub add_event_tags: bool,
    /// Property holding event tags (default: "Tags")
    #[serde(default)]
    pub add_event_property: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Base URI reported as the alert source
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    /// Name used by the default description
    #[serde(default = "default_host_name")]
    pub name: String,
}

fn default_base_uri() -> String {
    "http://localhost".to_string()
}

fn default_host_name() -> String {
    "opsgenie-relay".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            name: default_host_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Opsgenie API root (use https://api.eu.opsgenie.com for EU accounts)
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.opsgenie.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Maximum events dispatched concurrently
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_max_in_flight() -> usize {
    16
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("api.base_url", default_api_base_url())?
            .set_default("api.timeout_secs", 30)?
            .set_default("relay.max_in_flight", 16)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("OPSGENIE_RELAY_ENV")
                        .unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (OPSGENIE_RELAY__ALERT__API_KEY, etc.)
            .add_source(
                Environment::with_prefix("OPSGENIE_RELAY")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

/// A secret string that is wiped on drop and never printed
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "SecretString(<empty>)")
        } else {
            write!(f, "SecretString(<redacted>)")
        }
    }
}
