//! Config defaults: applies default values to parsed config.

use crate::schema::{
    CogForgeConfig, CustomVisionConfig, HttpConfig, LoggingConfig, ServiceConfig, SpeechConfig,
};

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Bound on a single remote call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delay between long-running operation polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Bound on the total time spent polling, in seconds.
pub const DEFAULT_POLL_MAX_WAIT_SECS: u64 = 120;

/// Global text translation endpoint.
pub const DEFAULT_TRANSLATOR_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

pub const DEFAULT_SPEECH_VOICE: &str = "fr-CA-JeanNeural";

pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: CogForgeConfig) -> CogForgeConfig {
    let config = apply_logging_defaults(config);
    let config = apply_http_defaults(config);
    let config = apply_translator_defaults(config);
    apply_speech_defaults(config)
}

fn apply_logging_defaults(mut config: CogForgeConfig) -> CogForgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

fn apply_http_defaults(mut config: CogForgeConfig) -> CogForgeConfig {
    let http = config.http.get_or_insert_with(HttpConfig::default);
    http.timeout_secs.get_or_insert(DEFAULT_TIMEOUT_SECS);
    http.poll_interval_ms.get_or_insert(DEFAULT_POLL_INTERVAL_MS);
    http.poll_max_wait_secs.get_or_insert(DEFAULT_POLL_MAX_WAIT_SECS);
    config
}

/// The translator has a well-known global endpoint; only the key is required.
fn apply_translator_defaults(mut config: CogForgeConfig) -> CogForgeConfig {
    let translator = config.translator.get_or_insert_with(ServiceConfig::default);
    if translator.endpoint.as_deref().map(str::is_empty).unwrap_or(true) {
        translator.endpoint = Some(DEFAULT_TRANSLATOR_ENDPOINT.to_string());
    }
    config
}

fn apply_speech_defaults(mut config: CogForgeConfig) -> CogForgeConfig {
    let speech = config.speech.get_or_insert_with(SpeechConfig::default);
    speech.voice.get_or_insert_with(|| DEFAULT_SPEECH_VOICE.to_string());
    speech.language.get_or_insert_with(|| DEFAULT_SPEECH_LANGUAGE.to_string());
    config
}

/// Skeleton written by `config init`: every section present with empty
/// credentials and the ambient defaults filled in.
pub fn template() -> CogForgeConfig {
    let blank = || {
        Some(ServiceConfig {
            endpoint: Some(String::new()),
            api_key: Some(String::new()),
            region: None,
        })
    };
    let config = CogForgeConfig {
        content_safety: blank(),
        vision: blank(),
        face: None,
        custom_vision: Some(CustomVisionConfig {
            prediction_endpoint: Some(String::new()),
            prediction_key: Some(String::new()),
            project_id: Some(String::new()),
            published_name: Some(String::new()),
        }),
        document_intelligence: blank(),
        speech: Some(SpeechConfig {
            api_key: Some(String::new()),
            region: Some(String::new()),
            ..Default::default()
        }),
        translator: Some(ServiceConfig {
            region: Some(String::new()),
            ..ServiceConfig::default()
        }),
        document_translation: blank(),
        logging: None,
        http: None,
    };
    apply_all_defaults(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_timeouts_and_log_level() {
        let cfg = apply_all_defaults(CogForgeConfig::default());
        let http = cfg.http.unwrap();
        assert_eq!(http.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(http.poll_interval_ms, Some(DEFAULT_POLL_INTERVAL_MS));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
        assert_eq!(
            cfg.translator.unwrap().endpoint.as_deref(),
            Some(DEFAULT_TRANSLATOR_ENDPOINT)
        );
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = CogForgeConfig::default();
        cfg.http = Some(HttpConfig {
            timeout_secs: Some(5),
            ..Default::default()
        });
        cfg.speech = Some(SpeechConfig {
            voice: Some("en-US-JennyNeural".into()),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.http.unwrap().timeout_secs, Some(5));
        assert_eq!(cfg.speech.unwrap().voice.as_deref(), Some("en-US-JennyNeural"));
    }

    #[test]
    fn template_lists_every_section() {
        let cfg = template();
        assert!(cfg.content_safety.is_some());
        assert!(cfg.custom_vision.is_some());
        assert_eq!(
            cfg.translator.unwrap().endpoint.as_deref(),
            Some(DEFAULT_TRANSLATOR_ENDPOINT)
        );
    }
}
