//! Responder configuration parsing
//!
//! Responders are configured as a comma-delimited list of `name` or
//! `name=type` tokens. A bare name is a team. The type is the second
//! non-empty `=` segment; anything after it is ignored.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Kind of entity Opsgenie notifies for an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderType {
    Team,
    User,
    Escalation,
    Schedule,
}

impl Default for ResponderType {
    fn default() -> Self {
        Self::Team
    }
}

impl ResponderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::User => "user",
            Self::Escalation => "escalation",
            Self::Schedule => "schedule",
        }
    }
}

impl std::fmt::Display for ResponderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponderType {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "team" => Ok(Self::Team),
            "user" => Ok(Self::User),
            "escalation" => Ok(Self::Escalation),
            "schedule" => Ok(Self::Schedule),
            _ => Err("invalid responder type; expected team|user|escalation|schedule"),
        }
    }
}

/// A single alert responder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responder {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResponderType,
}

impl Responder {
    pub fn new(name: impl Into<String>, kind: ResponderType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn team(name: impl Into<String>) -> Self {
        Self::new(name, ResponderType::Team)
    }
}

/// Parse a responders setting such as `"platform, oncall=user"`.
///
/// Tokens with an unknown type or an empty name are dropped with a debug
/// record; duplicates are kept.
pub fn parse_responders(raw: &str) -> Vec<Responder> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Option<Responder> {
    if !token.contains('=') {
        return Some(Responder::team(token));
    }

    // Empty segments are skipped, so `a==user` and `a=user=x` both read as `a=user`.
    let mut parts = token.split('=').filter(|part| !part.is_empty()).map(str::trim);
    let (Some(name), Some(kind)) = (parts.next(), parts.next()) else {
        debug!(responder = token, "Cannot parse responder: missing name or type");
        return None;
    };
    if name.is_empty() {
        debug!(responder = token, "Cannot parse responder: empty name");
        return None;
    }

    match kind.parse::<ResponderType>() {
        Ok(kind) => Some(Responder::new(name, kind)),
        Err(_) => {
            debug!(responder = token, "Cannot parse responder type");
            None
        }
    }
}
