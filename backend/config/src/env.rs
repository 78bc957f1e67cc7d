//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values of the config file are
//!   substituted at load time (`$${VAR}` escapes to a literal `${VAR}`);
//! - well-known variables (`VISION_ENDPOINT`, `SPEECH_KEY`, ...) override the
//!   matching config fields.

use std::collections::HashMap;

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::schema::{CogForgeConfig, CustomVisionConfig, ServiceConfig, SpeechConfig};

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env reference regex"));

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_REF_PATTERN.replace_all(s, |caps: &Captures| {
        let var_name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Collect all env var names referenced in a config value tree.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_REF_PATTERN.captures_iter(s) {
                if !caps[0].starts_with("$$") {
                    out.push(caps[1].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// First non-empty value among `names`.
fn lookup(env: &HashMap<String, String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|n| env.get(*n))
        .find(|v| !v.trim().is_empty())
        .cloned()
}

fn set(slot: &mut Option<String>, env: &HashMap<String, String>, names: &[&str]) {
    if let Some(v) = lookup(env, names) {
        *slot = Some(v);
    }
}

fn override_service(
    section: &mut Option<ServiceConfig>,
    env: &HashMap<String, String>,
    endpoint: &[&str],
    key: &[&str],
    region: &[&str],
) {
    if lookup(env, endpoint).is_none() && lookup(env, key).is_none() && lookup(env, region).is_none() {
        return;
    }
    let svc = section.get_or_insert_with(ServiceConfig::default);
    set(&mut svc.endpoint, env, endpoint);
    set(&mut svc.api_key, env, key);
    set(&mut svc.region, env, region);
}

/// Apply the well-known service variables from the process environment.
pub fn apply_env_overrides(config: CogForgeConfig) -> CogForgeConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply the well-known service variables from a provided map.
pub fn apply_env_overrides_with(
    mut config: CogForgeConfig,
    env: &HashMap<String, String>,
) -> CogForgeConfig {
    override_service(
        &mut config.content_safety,
        env,
        &["CONTENT_SAFETY_ENDPOINT"],
        &["CONTENT_SAFETY_KEY"],
        &[],
    );
    override_service(&mut config.vision, env, &["VISION_ENDPOINT"], &["VISION_KEY"], &[]);
    override_service(&mut config.face, env, &["FACE_ENDPOINT"], &["FACE_KEY"], &[]);
    override_service(
        &mut config.document_intelligence,
        env,
        &["DOCUMENT_INTELLIGENCE_ENDPOINT"],
        &["DOCUMENT_INTELLIGENCE_KEY"],
        &[],
    );
    override_service(
        &mut config.translator,
        env,
        &["TRANSLATOR_ENDPOINT"],
        &["TRANSLATOR_KEY"],
        &["TRANSLATOR_REGION"],
    );
    override_service(
        &mut config.document_translation,
        env,
        &["DOCUMENT_TRANSLATION_ENDPOINT"],
        &["DOCUMENT_TRANSLATION_KEY"],
        &[],
    );

    let cv_vars = [
        "VISION_PREDICTION_ENDPOINT",
        "VISION_PREDICTION_KEY",
        "CUSTOM_VISION_PROJECT_ID",
        "CUSTOM_VISION_PUBLISHED_NAME",
    ];
    if lookup(env, &cv_vars).is_some() {
        let cv = config.custom_vision.get_or_insert_with(CustomVisionConfig::default);
        set(&mut cv.prediction_endpoint, env, &["VISION_PREDICTION_ENDPOINT"]);
        set(&mut cv.prediction_key, env, &["VISION_PREDICTION_KEY"]);
        set(&mut cv.project_id, env, &["CUSTOM_VISION_PROJECT_ID"]);
        set(&mut cv.published_name, env, &["CUSTOM_VISION_PUBLISHED_NAME"]);
    }

    let speech_key = ["SPEECH_KEY", "SUBSCRIPTION_KEY"];
    let speech_region = ["SPEECH_REGION", "REGION"];
    if lookup(env, &speech_key).is_some()
        || lookup(env, &speech_region).is_some()
        || lookup(env, &["SPEECH_ENDPOINT"]).is_some()
    {
        let speech = config.speech.get_or_insert_with(SpeechConfig::default);
        set(&mut speech.api_key, env, &speech_key);
        set(&mut speech.region, env, &speech_region);
        set(&mut speech.endpoint, env, &["SPEECH_ENDPOINT"]);
    }

    config
}
