//! Log Redaction Layer
//!
//! Scrubs subscription keys, bearer tokens and `key=`/`sig=` query values
//! from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

/// 32-char hex keys and 84-char base62 keys issued for cognitive resources.
static SUBSCRIPTION_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-9a-fA-F]{32}|[0-9A-Za-z]{84})\b").expect("valid key regex")
});
static BEARER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").expect("valid bearer regex")
});
static QUERY_SECRET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([?&](?:key|subscription-key|sig)=)[^&\s]+").expect("valid query regex")
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = QUERY_SECRET_RE.replace_all(input, "${1}[REDACTED]");
    let redacted = BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    SUBSCRIPTION_KEY_RE
        .replace_all(&redacted, "[REDACTED_KEY]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "calling with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 and key 0123456789abcdef0123456789abcdef";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(!clean.contains("0123456789abcdef0123456789abcdef"));
        assert!(clean.contains("[REDACTED_KEY]"));
    }

    #[test]
    fn redacts_query_secrets() {
        let clean = redact_sensitive_data("https://x.example/a?key=abc&sig=def&api-version=3.0");
        assert_eq!(clean, "https://x.example/a?key=[REDACTED]&sig=[REDACTED]&api-version=3.0");
    }

    #[test]
    fn leaves_plain_text_alone() {
        let msg = "ContentSafety request failed with status 401: Access denied";
        assert_eq!(redact_sensitive_data(msg), msg);
    }
}
