//! cogforge configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Section and field names are
//! camelCase; the PascalCase spelling of `appsettings.json` files
//! (`ContentSafety: { Endpoint, ApiKey }`) is accepted through aliases.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CogForgeConfig {
    /// Content Safety (text/image moderation, blocklists, shield prompt)
    #[serde(default, alias = "ContentSafety", skip_serializing_if = "Option::is_none")]
    pub content_safety: Option<ServiceConfig>,

    /// Image Analysis 4.0
    #[serde(default, alias = "Vision", skip_serializing_if = "Option::is_none")]
    pub vision: Option<ServiceConfig>,

    /// Face detection; falls back to the vision section when absent
    #[serde(default, alias = "Face", skip_serializing_if = "Option::is_none")]
    pub face: Option<ServiceConfig>,

    #[serde(default, alias = "CustomVision", skip_serializing_if = "Option::is_none")]
    pub custom_vision: Option<CustomVisionConfig>,

    #[serde(default, alias = "DocumentIntelligence", skip_serializing_if = "Option::is_none")]
    pub document_intelligence: Option<ServiceConfig>,

    #[serde(default, alias = "Speech", skip_serializing_if = "Option::is_none")]
    pub speech: Option<SpeechConfig>,

    /// Text translation
    #[serde(default, alias = "Translator", skip_serializing_if = "Option::is_none")]
    pub translator: Option<ServiceConfig>,

    /// Document translation (single document + batch)
    #[serde(default, alias = "DocumentTranslation", skip_serializing_if = "Option::is_none")]
    pub document_translation: Option<ServiceConfig>,

    #[serde(default, alias = "Logging", skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    #[serde(default, alias = "Http", skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Endpoint + key for a keyed service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default, alias = "Endpoint", skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, alias = "ApiKey", alias = "Key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Resource region, needed by regional translator resources
    #[serde(default, alias = "Region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomVisionConfig {
    #[serde(default, alias = "PredictionEndpoint", skip_serializing_if = "Option::is_none")]
    pub prediction_endpoint: Option<String>,

    #[serde(default, alias = "PredictionKey", skip_serializing_if = "Option::is_none")]
    pub prediction_key: Option<String>,

    #[serde(default, alias = "ProjectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Published iteration name
    #[serde(default, alias = "PublishedName", skip_serializing_if = "Option::is_none")]
    pub published_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    #[serde(default, alias = "ApiKey", alias = "SubscriptionKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, alias = "Region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Overrides the regional hosts (private endpoints, test servers)
    #[serde(default, alias = "Endpoint", skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Default synthesis voice
    #[serde(default, alias = "Voice", skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// Default recognition language
    #[serde(default, alias = "Language", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

// ---------------------------------------------------------------------------
// Ambient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Filter directive (`info`, `debug`, `cogforge_safety=trace`, ...)
    #[serde(default, alias = "Level", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling NDJSON log file; console only when unset
    #[serde(default, alias = "Dir", skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    #[serde(default, alias = "TimeoutSecs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, alias = "PollIntervalMs", skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    #[serde(default, alias = "PollMaxWaitSecs", skip_serializing_if = "Option::is_none")]
    pub poll_max_wait_secs: Option<u64>,
}
