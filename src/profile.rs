//! Per-attachment alert profile
//!
//! Everything the dispatcher needs from [`AlertSettings`] is resolved here,
//! once, and never rechecked per event.

use crate::config::AlertSettings;
use crate::domain::{parse_responders, parse_static_tags, AlertPriority, Responder};
use crate::error::Result;
use crate::template::{AlertTemplates, HostInfo};

pub const DEFAULT_TAG_PROPERTY: &str = "Tags";

/// Immutable snapshot of normalized settings
#[derive(Debug)]
pub struct AlertProfile {
    pub templates: AlertTemplates,
    pub priority: AlertPriority,
    pub responders: Vec<Responder>,
    /// JSON rendering of `responders`, for diagnostics
    pub responder_summary: String,
    pub static_tags: Vec<String>,
    pub include_event_tags: bool,
    pub event_tag_property: String,
    pub host: HostInfo,
}

impl AlertProfile {
    pub fn from_settings(settings: &AlertSettings, host: HostInfo) -> Result<Self> {
        let templates = AlertTemplates::compile(
            settings.alert_message.as_deref(),
            settings.alert_description.as_deref(),
        )?;

        let priority = AlertPriority::resolve(settings.event_priority.as_deref());

        let responders = parse_responders(settings.responders.as_deref().unwrap_or_default());
        let responder_summary = serde_json::to_string(&responders)?;

        let static_tags = parse_static_tags(settings.tags.as_deref().unwrap_or_default());

        let event_tag_property = settings
            .add_event_property
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_TAG_PROPERTY)
            .to_string();

        Ok(Self {
            templates,
            priority,
            responders,
            responder_summary,
            static_tags,
            include_event_tags: settings.add_event_tags,
            event_tag_property,
            host,
        })
    }

    pub fn has_responders(&self) -> bool {
        !self.responders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResponderType;

    fn host() -> HostInfo {
        HostInfo::new("seq", "https://seq.example.com/")
    }

    #[test]
    fn empty_settings_use_defaults() {
        let profile = AlertProfile::from_settings(&AlertSettings::default(), host()).unwrap();
        assert_eq!(profile.priority, AlertPriority::P3);
        assert!(profile.responders.is_empty());
        assert!(!profile.has_responders());
        assert_eq!(profile.responder_summary, "[]");
        assert!(profile.static_tags.is_empty());
        assert!(!profile.include_event_tags);
        assert_eq!(profile.event_tag_property, "Tags");
    }

    #[test]
    fn settings_are_normalized() {
        let settings = AlertSettings {
            event_priority: Some("p1".to_string()),
            responders: Some("platform,oncall=user,ghost=robot".to_string()),
            tags: Some("infra, db,".to_string()),
            add_event_tags: true,
            add_event_property: Some("Labels".to_string()),
            ..Default::default()
        };
        let profile = AlertProfile::from_settings(&settings, host()).unwrap();

        assert_eq!(profile.priority, AlertPriority::P1);
        assert_eq!(
            profile.responders,
            vec![
                Responder::team("platform"),
                Responder::new("oncall", ResponderType::User)
            ]
        );
        assert_eq!(
            profile.responder_summary,
            r#"[{"name":"platform","type":"team"},{"name":"oncall","type":"user"}]"#
        );
        assert_eq!(profile.static_tags, vec!["infra", "db"]);
        assert!(profile.include_event_tags);
        assert_eq!(profile.event_tag_property, "Labels");
    }

    #[test]
    fn blank_tag_property_falls_back_to_default() {
        let settings = AlertSettings {
            add_event_tags: true,
            add_event_property: Some("  ".to_string()),
            ..Default::default()
        };
        let profile = AlertProfile::from_settings(&settings, host()).unwrap();
        assert_eq!(profile.event_tag_property, DEFAULT_TAG_PROPERTY);
    }

    #[test]
    fn normalizing_twice_is_idempotent() {
        let settings = AlertSettings {
            event_priority: Some("P4".to_string()),
            responders: Some("a, b=schedule".to_string()),
            tags: Some("x,y".to_string()),
            ..Default::default()
        };
        let first = AlertProfile::from_settings(&settings, host()).unwrap();
        let second = AlertProfile::from_settings(&settings, host()).unwrap();
        assert_eq!(first.responders, second.responders);
        assert_eq!(first.priority, second.priority);
        assert_eq!(first.static_tags, second.static_tags);
        assert_eq!(first.responder_summary, second.responder_summary);
    }

    #[test]
    fn bad_template_fails_normalization() {
        let settings = AlertSettings {
            alert_description: Some("{{#each}}".to_string()),
            ..Default::default()
        };
        assert!(AlertProfile::from_settings(&settings, host()).is_err());
    }
}
