use opsgenie_relay::{AlertApp, AlertPriority, AppConfig};
use std::path::PathBuf;

fn temp_config_dir(default_toml: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("opsgenie-relay-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("default.toml"), default_toml).unwrap();
    dir
}

/// Settings from default.toml are layered over built-in defaults.
#[test]
fn loads_default_toml() {
    let dir = temp_config_dir(
        r#"
[alert]
api_key = "from-file"
event_priority = "p5"
responders = "platform, nightly=schedule"
tags = "infra"
add_event_tags = true

[host]
base_uri = "https://seq.example.com/"

[api]
base_url = "https://api.eu.opsgenie.com"
"#,
    );

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.alert.api_key.expose(), "from-file");
    assert_eq!(config.api.base_url, "https://api.eu.opsgenie.com");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.logging.level, "info");

    let app = AlertApp::attach(&config).unwrap();
    let profile = app.profile();
    assert_eq!(profile.priority, AlertPriority::P5);
    assert_eq!(profile.responders.len(), 2);
    assert_eq!(profile.static_tags, vec!["infra"]);
    assert!(profile.include_event_tags);
    assert_eq!(profile.event_tag_property, "Tags");
    app.detach();

    std::fs::remove_dir_all(dir).ok();
}

/// Environment variables override file values.
#[test]
fn environment_overrides_file() {
    let dir = temp_config_dir("[relay]\nmax_in_flight = 4\n");
    std::env::set_var("OPSGENIE_RELAY__RELAY__MAX_IN_FLIGHT", "9");

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.relay.max_in_flight, 9);

    std::env::remove_var("OPSGENIE_RELAY__RELAY__MAX_IN_FLIGHT");
    std::fs::remove_dir_all(dir).ok();
}

/// A missing directory still yields a usable default configuration.
#[test]
fn missing_directory_uses_defaults() {
    let config = AppConfig::load_from("/nonexistent/opsgenie-relay").unwrap();
    assert_eq!(config.host.base_uri, "http://localhost");
    assert!(config.alert.api_key.is_empty());
    assert!(matches!(
        AlertApp::attach(&config),
        Err(opsgenie_relay::RelayError::InvalidConfig(_))
    ));
}
