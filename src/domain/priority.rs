use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opsgenie alert priority, P1 (highest) to P5 (lowest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertPriority {
    P1,
    P2,
    P3,
    P4,
    P5,
}

impl Default for AlertPriority {
    fn default() -> Self {
        Self::P3
    }
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
            Self::P5 => "P5",
        }
    }

    /// Resolve a configured priority, falling back to P3 for anything
    /// that is not exactly `P1`..`P5` (case-insensitive).
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.and_then(|r| r.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertPriority {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = raw.as_bytes();
        if bytes.len() != 2 || !bytes[0].eq_ignore_ascii_case(&b'p') {
            return Err("invalid priority; expected P1|P2|P3|P4|P5");
        }
        match bytes[1] {
            b'1' => Ok(Self::P1),
            b'2' => Ok(Self::P2),
            b'3' => Ok(Self::P3),
            b'4' => Ok(Self::P4),
            b'5' => Ok(Self::P5),
            _ => Err("invalid priority; expected P1|P2|P3|P4|P5"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_accepts_valid_priorities_case_insensitively() {
        assert_eq!(AlertPriority::resolve(Some("P1")), AlertPriority::P1);
        assert_eq!(AlertPriority::resolve(Some("p2")), AlertPriority::P2);
        assert_eq!(AlertPriority::resolve(Some("P5")), AlertPriority::P5);
        assert_eq!(AlertPriority::resolve(Some("p4")).to_string(), "P4");
    }

    #[test]
    fn resolve_falls_back_to_p3() {
        for raw in ["", "P0", "P6", "P12", "high", " P1", "P1 ", "1", "PP"] {
            assert_eq!(
                AlertPriority::resolve(Some(raw)),
                AlertPriority::P3,
                "`{raw}` should fall back to P3"
            );
        }
        assert_eq!(AlertPriority::resolve(None), AlertPriority::P3);
    }

    #[test]
    fn serializes_as_uppercase_token() {
        let json = serde_json::to_string(&AlertPriority::P1).unwrap();
        assert_eq!(json, "\"P1\"");
    }
}
