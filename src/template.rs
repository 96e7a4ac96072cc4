//! Alert message and description templates
//!
//! Templates use Handlebars syntax. Event properties are available by name
//! (`{{Host}}`), alongside the built-ins `Id`, `Message`, `Level`,
//! `Timestamp`, `BaseUri`, `HostName` and the full `Properties` map.
//! Built-ins win when a property shares their name.

use handlebars::Handlebars;
use serde_json::{Map, Value};

use crate::domain::LogEvent;
use crate::error::Result;

pub const DEFAULT_MESSAGE_TEMPLATE: &str = "{{Message}}";
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str = "Generated by {{HostName}} running at {{BaseUri}}.";

const MESSAGE: &str = "message";
const DESCRIPTION: &str = "description";

/// Identity of the host the events come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub name: String,
    pub base_uri: String,
}

impl HostInfo {
    pub fn new(name: impl Into<String>, base_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_uri: base_uri.into(),
        }
    }
}

/// Rendering environment for one event
pub struct MessageContext<'a> {
    pub event: &'a LogEvent,
    pub host: &'a HostInfo,
}

impl<'a> MessageContext<'a> {
    pub fn new(event: &'a LogEvent, host: &'a HostInfo) -> Self {
        Self { event, host }
    }

    fn to_value(&self) -> Result<Value> {
        let properties = serde_json::to_value(&self.event.properties)?;

        let mut data = match &properties {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        data.insert("Id".to_string(), Value::String(self.event.id.clone()));
        data.insert(
            "Message".to_string(),
            Value::String(self.event.message.clone()),
        );
        data.insert(
            "Level".to_string(),
            self.event
                .level
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        data.insert(
            "Timestamp".to_string(),
            Value::String(self.event.timestamp.to_rfc3339()),
        );
        data.insert(
            "BaseUri".to_string(),
            Value::String(self.host.base_uri.clone()),
        );
        data.insert("HostName".to_string(), Value::String(self.host.name.clone()));
        data.insert("Properties".to_string(), properties);

        Ok(Value::Object(data))
    }
}

/// Message and description templates compiled once per attachment
pub struct AlertTemplates {
    registry: Handlebars<'static>,
}

impl AlertTemplates {
    /// Compile the configured templates, using the defaults for blank ones.
    pub fn compile(message: Option<&str>, description: Option<&str>) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(MESSAGE, or_default(message, DEFAULT_MESSAGE_TEMPLATE))?;
        registry.register_template_string(
            DESCRIPTION,
            or_default(description, DEFAULT_DESCRIPTION_TEMPLATE),
        )?;
        Ok(Self { registry })
    }

    pub fn render_message(&self, ctx: &MessageContext<'_>) -> Result<String> {
        Ok(self.registry.render(MESSAGE, &ctx.to_value()?)?)
    }

    pub fn render_description(&self, ctx: &MessageContext<'_>) -> Result<String> {
        Ok(self.registry.render(DESCRIPTION, &ctx.to_value()?)?)
    }
}

impl std::fmt::Debug for AlertTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertTemplates").finish_non_exhaustive()
    }
}

fn or_default<'a>(configured: Option<&'a str>, default: &'a str) -> &'a str {
    match configured {
        Some(text) if !text.trim().is_empty() => text,
        _ => default,
    }
}
