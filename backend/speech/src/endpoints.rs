//! Regional speech hosts.

use std::time::Duration;

use cogforge_core::{CogError, CogResult, ServiceClient, ServiceCredentials};

pub const SERVICE_NAME: &str = "Speech";

/// Base URLs of the three speech hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechEndpoints {
    /// Text to speech.
    pub tts: String,
    /// Short-audio speech to text.
    pub stt: String,
    /// Fast transcription and speaker recognition.
    pub api: String,
}

impl SpeechEndpoints {
    pub fn for_region(region: &str) -> Self {
        Self {
            tts: format!("https://{region}.tts.speech.microsoft.com"),
            stt: format!("https://{region}.stt.speech.microsoft.com"),
            api: format!("https://{region}.api.cognitive.microsoft.com"),
        }
    }

    /// Every host served from one base URL.
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            tts: base.clone(),
            stt: base.clone(),
            api: base,
        }
    }

    /// Explicit endpoint wins over the region.
    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        if !credentials.endpoint.trim().is_empty() {
            return Ok(Self::single(credentials.endpoint.trim()));
        }
        match credentials.region.as_deref().map(str::trim) {
            Some(region) if !region.is_empty() => Ok(Self::for_region(region)),
            _ => Err(CogError::configuration("Speech:Region is not configured")),
        }
    }
}

/// Key-carrying HTTP client for one speech host.
pub(crate) fn host_client(
    base: &str,
    api_key: &str,
    timeout: Option<Duration>,
) -> CogResult<ServiceClient> {
    let client = ServiceClient::new(SERVICE_NAME, base, api_key)?;
    Ok(match timeout {
        Some(timeout) => client.with_timeout(timeout),
        None => client,
    })
}
