//! Config redaction: produce safe-to-share config snapshots by masking sensitive fields.
//!
//! Masks API keys, prediction/subscription keys and SAS signatures in URLs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Field names whose values are secrets.
static SECRET_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "key",
    "predictionKey",
    "prediction_key",
    "subscriptionKey",
    "subscription_key",
    "trainingKey",
    "training_key",
    "token",
    "secret",
    "password",
];

/// `sig=` query parameter of a SAS URL.
static SAS_SIGNATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([?&]sig=)[^&\s]+").expect("valid SAS regex"));

/// Redact a config JSON value, replacing all sensitive fields.
///
/// The resulting value is safe to log or print with `config show`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if is_sensitive_key(key) && !s.is_empty() {
        // Keep a short prefix so operators can tell keys apart.
        let hint = if s.chars().count() > 8 {
            format!("{}***", s.chars().take(4).collect::<String>())
        } else {
            "***".to_string()
        };
        return Value::String(hint);
    }

    if SAS_SIGNATURE.is_match(s) {
        return Value::String(SAS_SIGNATURE.replace_all(s, "${1}***").into_owned());
    }

    Value::String(s.to_string())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

/// Collect all field paths that were redacted (for diagnostics).
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths_recursive(value, "", &mut paths);
    paths
}

fn collect_paths_recursive(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => {
            let key = path.rsplit('.').next().unwrap_or("");
            if is_sensitive_key(key) || SAS_SIGNATURE.is_match(s) {
                out.push(path.to_string());
            }
        }
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                collect_paths_recursive(v, &format!("{path}[{i}]"), out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                collect_paths_recursive(v, &child_path, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_key() {
        let v = json!({ "contentSafety": { "apiKey": "0123456789abcdef" } });
        let redacted = redact(&v);
        let key = redacted["contentSafety"]["apiKey"].as_str().unwrap();
        assert_eq!(key, "0123***");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let v = json!({ "customVision": { "predictionKey": "abc" } });
        assert_eq!(redact(&v)["customVision"]["predictionKey"], "***");
    }

    #[test]
    fn masks_sas_signature() {
        let v = json!({ "target": "https://acct.blob.core.windows.net/out?sv=2022&sig=SECRETSIG&se=1" });
        let redacted = redact(&v);
        let url = redacted["target"].as_str().unwrap();
        assert!(!url.contains("SECRETSIG"));
        assert!(url.contains("sig=***&se=1"));
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "logging": { "level": "debug" }, "vision": { "endpoint": "https://v.example" } });
        let redacted = redact(&v);
        assert_eq!(redacted, v);
    }

    #[test]
    fn collects_paths() {
        let v = json!({ "speech": { "apiKey": "k", "region": "eastus" } });
        assert_eq!(collect_redacted_paths(&v), vec!["speech.apiKey".to_string()]);
    }
}
