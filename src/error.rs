use thiserror::Error;

/// Main error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Template errors
    #[error("Template compile error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Template render error: {0}")]
    Render(#[from] handlebars::RenderError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Opsgenie API returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Host contract errors
    #[error("No event was supplied to the dispatcher")]
    MissingEvent,

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    /// True for failures raised by the alerting API transport or service
    pub fn is_api_failure(&self) -> bool {
        matches!(self, RelayError::Http(_) | RelayError::ApiStatus { .. })
    }
}

/// Result type alias for RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_display_includes_status_and_body() {
        let err = RelayError::ApiStatus {
            status: 422,
            body: "{\"message\":\"Request body is not processable\"}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("not processable"));
        assert!(err.is_api_failure());
    }

    #[test]
    fn missing_event_is_not_an_api_failure() {
        assert!(!RelayError::MissingEvent.is_api_failure());
    }
}
