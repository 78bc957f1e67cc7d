//! Text to speech over REST.

use std::time::Duration;

use bytes::Bytes;
use cogforge_core::{CogResult, ServiceClient, ServiceCredentials};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::endpoints::{host_client, SpeechEndpoints};
use crate::ssml::Ssml;

pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
pub const DEFAULT_OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";
pub const DEFAULT_VOICE: &str = "fr-CA-JeanNeural";
pub const SAMPLE_SYNTHESIS_TEXT: &str = "Bonjour, bienvenue dans la démonstration de synthèse vocale.";

/// The three-voice greeting used by the multi-voice sample.
pub fn multi_voice_sample() -> Ssml {
    Ssml::new("en-US")
        .voice("en-US-AriaNeural", "Hello, how are you?")
        .voice("es-ES-ElviraNeural", "Hola, ¿cómo estás?")
        .voice("fr-FR-DeniseNeural", "Bonjour, comment ça va ?")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub ssml: Ssml,
    pub output_format: String,
}

impl SynthesisRequest {
    pub fn new(ssml: Ssml) -> Self {
        Self {
            ssml,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }

    pub fn text(voice: &str, text: impl Into<String>) -> Self {
        Self::new(Ssml::single(voice, text))
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub audio: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceInfo {
    pub short_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    pub locale: String,
    #[serde(default)]
    pub voice_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SpeechSynthesizer {
    http: ServiceClient,
}

impl SpeechSynthesizer {
    pub fn new(endpoints: &SpeechEndpoints, api_key: &str, timeout: Option<Duration>) -> CogResult<Self> {
        Ok(Self {
            http: host_client(&endpoints.tts, api_key, timeout)?,
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Self::new(
            &SpeechEndpoints::from_credentials(credentials)?,
            &credentials.api_key,
            None,
        )
    }

    pub async fn synthesize(&self, request: &SynthesisRequest) -> CogResult<SynthesizedAudio> {
        request.ssml.validate()?;
        let body = request.ssml.render();
        info!(
            voices = request.ssml.segments().len(),
            format = %request.output_format,
            "Synthesizing speech"
        );
        let req = self
            .http
            .request(Method::POST, "/cognitiveservices/v1")
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, &request.output_format)
            .header("User-Agent", "cogforge")
            .body(body);
        let resp = self.http.send("synthesize speech", req).await?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/wav")
            .to_string();
        let audio = self.http.read_bytes("synthesize speech", resp).await?;
        info!(bytes = audio.len(), "Speech synthesized");
        Ok(SynthesizedAudio {
            audio,
            content_type,
        })
    }

    pub async fn list_voices(&self) -> CogResult<Vec<VoiceInfo>> {
        self.http
            .get_json("list voices", "/cognitiveservices/voices/list")
            .await
    }
}
