use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CogError, CogResult};

/// Highest severity a moderation service reports.
pub const MAX_SEVERITY: u8 = 7;

/// Risk score for one harm category, on the 0-7 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(pub u8);

impl Severity {
    pub const SAFE: Severity = Severity(0);

    pub fn value(self) -> u8 {
        self.0
    }

    /// Human-readable band for this severity.
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "Safe",
            1 | 2 => "Low Risk",
            3 | 4 => "Medium Risk",
            5 | 6 => "High Risk",
            7 => "Very High Risk",
            _ => "Unknown",
        }
    }

    pub fn is_safe(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for Severity {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, MAX_SEVERITY)
    }
}

/// Harm categories scored by content moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    Hate,
    SelfHarm,
    Sexual,
    Violence,
}

impl HarmCategory {
    /// Every category, in report order.
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Hate,
        HarmCategory::SelfHarm,
        HarmCategory::Sexual,
        HarmCategory::Violence,
    ];

    /// Name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Hate => "Hate",
            Self::SelfHarm => "SelfHarm",
            Self::Sexual => "Sexual",
            Self::Violence => "Violence",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Hate => "Hate Speech",
            Self::SelfHarm => "Self Harm",
            Self::Sexual => "Sexual Content",
            Self::Violence => "Violence",
        }
    }
}

impl fmt::Display for HarmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Endpoint, key and optional region for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub endpoint: String,
    pub api_key: String,
    pub region: Option<String>,
}

impl ServiceCredentials {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Check a user-supplied value bound for a query string: a language tag,
/// locale or model version made of letters, digits, `-`, `_` and `.`.
pub fn query_token<'a>(name: &str, value: &'a str) -> CogResult<&'a str> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(value)
    } else {
        Err(CogError::invalid_request(format!("invalid {name} '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_tokens() {
        assert_eq!(query_token("language", "zh-Hans").unwrap(), "zh-Hans");
        assert!(query_token("model version", "2023-10-01").is_ok());
        let err = query_token("language", "en&to=xx").unwrap_err();
        assert_eq!(err.to_string(), "invalid request: invalid language 'en&to=xx'");
        assert!(query_token("language", "").is_err());
        assert!(query_token("language", "fr#frag").is_err());
    }

    #[test]
    fn every_in_range_severity_has_one_band() {
        let bands = ["Safe", "Low Risk", "Medium Risk", "High Risk", "Very High Risk"];
        for s in 0..=MAX_SEVERITY {
            let desc = Severity(s).description();
            assert_eq!(bands.iter().filter(|b| **b == desc).count(), 1, "severity {s}");
        }
    }

    #[test]
    fn severity_banding() {
        assert_eq!(Severity(0).description(), "Safe");
        assert_eq!(Severity(1).description(), "Low Risk");
        assert_eq!(Severity(2).description(), "Low Risk");
        assert_eq!(Severity(3).description(), "Medium Risk");
        assert_eq!(Severity(4).description(), "Medium Risk");
        assert_eq!(Severity(5).description(), "High Risk");
        assert_eq!(Severity(6).description(), "High Risk");
        assert_eq!(Severity(7).description(), "Very High Risk");
        assert_eq!(Severity(8).description(), "Unknown");
    }

    #[test]
    fn category_roundtrips_wire_name() {
        let parsed: HarmCategory = serde_json::from_str("\"SelfHarm\"").unwrap();
        assert_eq!(parsed, HarmCategory::SelfHarm);
        assert_eq!(parsed.display_name(), "Self Harm");
    }

    #[test]
    fn severity_displays_scale() {
        assert_eq!(Severity(4).to_string(), "4/7");
    }
}
