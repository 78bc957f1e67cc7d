//! Config validation: section checks with user-friendly error messages.

use crate::schema::{CogForgeConfig, ServiceConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &CogForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let services = [
        ("contentSafety", &config.content_safety),
        ("vision", &config.vision),
        ("face", &config.face),
        ("documentIntelligence", &config.document_intelligence),
        ("translator", &config.translator),
        ("documentTranslation", &config.document_translation),
    ];
    for (path, section) in services {
        if let Some(section) = section {
            validate_service(path, section, &mut report);
        }
    }
    validate_custom_vision(config, &mut report);
    validate_speech(config, &mut report);
    validate_http(config, &mut report);
    report
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn check_endpoint(path: String, endpoint: &Option<String>, report: &mut ValidationReport) {
    if let Some(url) = endpoint.as_deref().filter(|u| !u.trim().is_empty()) {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            report.error(path, format!("Endpoint must be an http(s) URL, got '{url}'"));
        }
    }
}

fn validate_service(path: &str, section: &ServiceConfig, report: &mut ValidationReport) {
    check_endpoint(format!("{path}.endpoint"), &section.endpoint, report);
    if is_set(&section.endpoint) && !is_set(&section.api_key) {
        report.warn(format!("{path}.apiKey"), "Endpoint is set but no API key is configured");
    }
    if is_set(&section.api_key) && !is_set(&section.endpoint) {
        report.warn(format!("{path}.endpoint"), "API key is set but no endpoint is configured");
    }
}

fn validate_custom_vision(config: &CogForgeConfig, report: &mut ValidationReport) {
    let Some(cv) = &config.custom_vision else { return };
    check_endpoint(
        "customVision.predictionEndpoint".into(),
        &cv.prediction_endpoint,
        report,
    );
    if is_set(&cv.prediction_endpoint) && !is_set(&cv.project_id) {
        report.warn("customVision.projectId", "Prediction endpoint is set but no project id");
    }
    if is_set(&cv.project_id) && !is_set(&cv.published_name) {
        report.warn(
            "customVision.publishedName",
            "Project id is set but no published iteration name",
        );
    }
}

fn validate_speech(config: &CogForgeConfig, report: &mut ValidationReport) {
    let Some(speech) = &config.speech else { return };
    check_endpoint("speech.endpoint".into(), &speech.endpoint, report);
    if is_set(&speech.api_key) && !is_set(&speech.region) && !is_set(&speech.endpoint) {
        report.warn("speech.region", "Speech key is set but neither region nor endpoint is");
    }
}

fn validate_http(config: &CogForgeConfig, report: &mut ValidationReport) {
    let Some(http) = &config.http else { return };
    if http.timeout_secs == Some(0) {
        report.error("http.timeoutSecs", "timeoutSecs must be > 0");
    }
    if http.poll_interval_ms == Some(0) {
        report.error("http.pollIntervalMs", "pollIntervalMs must be > 0");
    }
    if let (Some(interval_ms), Some(max_secs)) = (http.poll_interval_ms, http.poll_max_wait_secs) {
        if interval_ms > max_secs.saturating_mul(1_000) {
            report.warn(
                "http.pollIntervalMs",
                "Poll interval is longer than the maximum wait; operations poll once",
            );
        }
    }
}
