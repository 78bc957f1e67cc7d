//! Typed accessors turning config sections into client credentials.

use std::path::PathBuf;
use std::time::Duration;

use cogforge_core::{CogError, CogResult, PollOptions, ServiceCredentials};

use crate::defaults::{
    DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_MAX_WAIT_SECS,
    DEFAULT_SPEECH_LANGUAGE, DEFAULT_SPEECH_VOICE, DEFAULT_TIMEOUT_SECS,
};
use crate::schema::{CogForgeConfig, ServiceConfig};

/// Endpoint + key sections of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSection {
    ContentSafety,
    Vision,
    Face,
    DocumentIntelligence,
    Translator,
    DocumentTranslation,
}

impl ServiceSection {
    /// Name used in configuration error messages (`ContentSafety:Endpoint`).
    pub fn label(self) -> &'static str {
        match self {
            Self::ContentSafety => "ContentSafety",
            Self::Vision => "Vision",
            Self::Face => "Face",
            Self::DocumentIntelligence => "DocumentIntelligence",
            Self::Translator => "Translator",
            Self::DocumentTranslation => "DocumentTranslation",
        }
    }
}

/// Custom Vision prediction target: credentials plus the published iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomVisionTarget {
    pub credentials: ServiceCredentials,
    pub project_id: String,
    pub published_name: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn missing(label: &str, field: &str) -> CogError {
    CogError::configuration(format!("{label}:{field} is not configured"))
}

fn service_credentials(label: &str, section: Option<&ServiceConfig>) -> CogResult<ServiceCredentials> {
    let section = section.ok_or_else(|| missing(label, "Endpoint"))?;
    let endpoint = non_empty(&section.endpoint).ok_or_else(|| missing(label, "Endpoint"))?;
    let api_key = non_empty(&section.api_key).ok_or_else(|| missing(label, "ApiKey"))?;
    let credentials = ServiceCredentials::new(endpoint, api_key);
    Ok(match non_empty(&section.region) {
        Some(region) => credentials.with_region(region),
        None => credentials,
    })
}

impl CogForgeConfig {
    /// Credentials for a keyed service section.
    ///
    /// `Face` falls back to the `vision` section when it has no section of its own.
    pub fn credentials(&self, section: ServiceSection) -> CogResult<ServiceCredentials> {
        let config = match section {
            ServiceSection::ContentSafety => self.content_safety.as_ref(),
            ServiceSection::Vision => self.vision.as_ref(),
            ServiceSection::Face => self
                .face
                .as_ref()
                .filter(|f| non_empty(&f.endpoint).is_some())
                .or(self.vision.as_ref()),
            ServiceSection::DocumentIntelligence => self.document_intelligence.as_ref(),
            ServiceSection::Translator => self.translator.as_ref(),
            ServiceSection::DocumentTranslation => self.document_translation.as_ref(),
        };
        service_credentials(section.label(), config)
    }

    /// Speech key and region. `endpoint` is the explicit override, empty when
    /// the regional hosts should be used.
    pub fn speech_credentials(&self) -> CogResult<ServiceCredentials> {
        let speech = self.speech.as_ref().ok_or_else(|| missing("Speech", "ApiKey"))?;
        let api_key = non_empty(&speech.api_key).ok_or_else(|| missing("Speech", "ApiKey"))?;
        let endpoint = non_empty(&speech.endpoint).unwrap_or_default();
        let region = non_empty(&speech.region);
        if endpoint.is_empty() && region.is_none() {
            return Err(missing("Speech", "Region"));
        }
        let credentials = ServiceCredentials::new(endpoint, api_key);
        Ok(match region {
            Some(region) => credentials.with_region(region),
            None => credentials,
        })
    }

    pub fn custom_vision_target(&self) -> CogResult<CustomVisionTarget> {
        const LABEL: &str = "CustomVision";
        let cv = self
            .custom_vision
            .as_ref()
            .ok_or_else(|| missing(LABEL, "PredictionEndpoint"))?;
        let endpoint =
            non_empty(&cv.prediction_endpoint).ok_or_else(|| missing(LABEL, "PredictionEndpoint"))?;
        let key = non_empty(&cv.prediction_key).ok_or_else(|| missing(LABEL, "PredictionKey"))?;
        let project_id = non_empty(&cv.project_id).ok_or_else(|| missing(LABEL, "ProjectId"))?;
        let published_name =
            non_empty(&cv.published_name).ok_or_else(|| missing(LABEL, "PublishedName"))?;
        Ok(CustomVisionTarget {
            credentials: ServiceCredentials::new(endpoint, key),
            project_id: project_id.to_string(),
            published_name: published_name.to_string(),
        })
    }

    pub fn speech_voice(&self) -> &str {
        self.speech
            .as_ref()
            .and_then(|s| non_empty(&s.voice))
            .unwrap_or(DEFAULT_SPEECH_VOICE)
    }

    pub fn speech_language(&self) -> &str {
        self.speech
            .as_ref()
            .and_then(|s| non_empty(&s.language))
            .unwrap_or(DEFAULT_SPEECH_LANGUAGE)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| non_empty(&l.level))
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| non_empty(&l.dir))
            .map(PathBuf::from)
    }

    /// Per-request bound applied to every service client.
    pub fn http_timeout(&self) -> Duration {
        let secs = self
            .http
            .as_ref()
            .and_then(|h| h.timeout_secs)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn poll_options(&self) -> PollOptions {
        let http = self.http.as_ref();
        let interval_ms = http
            .and_then(|h| h.poll_interval_ms)
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        let max_wait_secs = http
            .and_then(|h| h.poll_max_wait_secs)
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_POLL_MAX_WAIT_SECS);
        PollOptions {
            interval: Duration::from_millis(interval_ms),
            max_wait: Duration::from_secs(max_wait_secs),
        }
    }
}
