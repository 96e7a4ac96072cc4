use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::profile::AlertProfile;

#[derive(Parser, Debug)]
#[command(name = "opsgenie-relay")]
#[command(version)]
#[command(about = "Relay structured log events to Opsgenie alerts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml and per-environment overrides
    #[arg(short, long, global = true, default_value = "config", env = "OPSGENIE_RELAY_CONFIG_DIR")]
    pub config_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read CLEF events and raise an alert for each one
    Run {
        /// Input file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Validate the configuration and print the normalized alert profile
    Check,
}

/// Human-readable summary of a normalized profile
pub fn format_profile(profile: &AlertProfile) -> String {
    let tags = if profile.static_tags.is_empty() {
        "(none)".to_string()
    } else {
        profile.static_tags.join(", ")
    };
    let event_tags = if profile.include_event_tags {
        format!("from property '{}'", profile.event_tag_property)
    } else {
        "disabled".to_string()
    };

    format!(
        "Priority:    {}\n\
         Responders:  {}\n\
         Tags:        {}\n\
         Event tags:  {}\n\
         Source:      {}",
        profile.priority,
        profile.responder_summary,
        tags,
        event_tags,
        profile.host.base_uri
    )
}
