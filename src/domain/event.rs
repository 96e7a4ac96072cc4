//! Incoming log events
//!
//! Events arrive as CLEF (compact log event format) JSON objects: reserved
//! keys start with `@`, everything else is a property.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{RelayError, Result};

/// A property value as seen by the tag aggregator
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    List(Vec<String>),
    Other(Value),
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Other(other),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

/// A single log event delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: Option<String>,
    pub message: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl LogEvent {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now(),
            level: None,
            message: message.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Parse one CLEF line.
    pub fn from_clef(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        match value {
            Value::Object(map) => Self::from_clef_object(map),
            _ => Err(RelayError::InvalidEvent(
                "CLEF event must be a JSON object".to_string(),
            )),
        }
    }

    fn from_clef_object(map: Map<String, Value>) -> Result<Self> {
        let mut timestamp = None;
        let mut message = None;
        let mut message_template = None;
        let mut level = None;
        let mut id = None;
        let mut properties = BTreeMap::new();

        for (key, value) in map {
            match key.as_str() {
                "@t" => {
                    let raw = value.as_str().ok_or_else(|| {
                        RelayError::InvalidEvent("@t must be a string".to_string())
                    })?;
                    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|e| {
                        RelayError::InvalidEvent(format!("invalid @t timestamp '{}': {}", raw, e))
                    })?;
                    timestamp = Some(parsed.with_timezone(&Utc));
                }
                "@m" => message = Some(value_to_string(value)),
                "@mt" => message_template = Some(value_to_string(value)),
                "@l" => level = Some(value_to_string(value)),
                "@i" => id = Some(value_to_string(value)),
                _ if key.starts_with("@@") => {
                    properties.insert(key[1..].to_string(), PropertyValue::from(value));
                }
                _ if key.starts_with('@') => {}
                _ => {
                    properties.insert(key, PropertyValue::from(value));
                }
            }
        }

        Ok(Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp: timestamp.unwrap_or_else(Utc::now),
            level,
            message: message.or(message_template).unwrap_or_default(),
            properties,
        })
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
