//! Speech to text: short-audio recognition, fast transcription and
//! language identification.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cogforge_core::{
    query_token, Analyzer, CogError, CogResult, PayloadKind, RequestPayload, ServiceClient,
    ServiceCredentials,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::endpoints::{host_client, SpeechEndpoints, SERVICE_NAME};

pub const DEFAULT_RECOGNITION_LANGUAGE: &str = "en-US";
pub const DEFAULT_CANDIDATE_LOCALES: [&str; 3] = ["en-US", "es-ES", "fr-FR"];
pub const TRANSCRIPTION_API_VERSION: &str = "2024-11-15";
pub const WAV_CONTENT_TYPE: &str = "audio/wav; codecs=audio/pcm; samplerate=16000";

pub const SAMPLE_ENROLL_AUDIO: &str = "Audio/enroll.wav";
pub const SAMPLE_MULTI_LANGUAGE_AUDIO: &str = "Audio/multi_language_speech.wav";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NBestEntry {
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: Option<String>,
    #[serde(default, rename = "NBest")]
    n_best: Vec<NBestEntry>,
}

/// Outcome of a single-utterance recognition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RecognitionOutcome {
    Recognized {
        text: String,
        confidence: Option<f64>,
    },
    NoMatch,
    Canceled {
        reason: String,
    },
}

impl RecognitionOutcome {
    fn from_response(resp: RecognitionResponse) -> Self {
        match resp.recognition_status.as_str() {
            "Success" => {
                let best = resp.n_best.into_iter().next();
                let confidence = best.as_ref().and_then(|b| b.confidence);
                let text = resp
                    .display_text
                    .or_else(|| best.and_then(|b| b.display))
                    .unwrap_or_default();
                Self::Recognized { text, confidence }
            }
            "NoMatch" => Self::NoMatch,
            other => Self::Canceled {
                reason: other.to_string(),
            },
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Recognized { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribedPhrase {
    pub text: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub offset_milliseconds: u64,
    #[serde(default)]
    pub duration_milliseconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPhrase {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    #[serde(default)]
    pub duration_milliseconds: u64,
    #[serde(default)]
    pub combined_phrases: Vec<CombinedPhrase>,
    #[serde(default)]
    pub phrases: Vec<TranscribedPhrase>,
}

impl Transcription {
    pub fn text(&self) -> String {
        self.combined_phrases
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageIdentification {
    pub text: String,
    /// Locale of the first phrase, when the service returned any.
    pub language: Option<String>,
}

#[derive(Serialize)]
struct TranscriptionDefinition<'a> {
    locales: &'a [String],
}

#[derive(Debug, Clone)]
pub struct SpeechRecognizer {
    stt: ServiceClient,
    api: ServiceClient,
    language: String,
}

pub fn recognition_path(language: &str) -> CogResult<String> {
    let language = query_token("language", language)?;
    Ok(format!(
        "/speech/recognition/conversation/cognitiveservices/v1?language={language}&format=detailed"
    ))
}

impl SpeechRecognizer {
    pub fn new(endpoints: &SpeechEndpoints, api_key: &str, timeout: Option<Duration>) -> CogResult<Self> {
        Ok(Self {
            stt: host_client(&endpoints.stt, api_key, timeout)?,
            api: host_client(&endpoints.api, api_key, timeout)?,
            language: DEFAULT_RECOGNITION_LANGUAGE.to_string(),
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Self::new(
            &SpeechEndpoints::from_credentials(credentials)?,
            &credentials.api_key,
            None,
        )
    }

    /// Language used by [`Analyzer::analyze`].
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub async fn recognize(&self, audio: Bytes, language: &str) -> CogResult<RecognitionOutcome> {
        if audio.is_empty() {
            return Err(CogError::invalid_request("audio payload is empty"));
        }
        info!(bytes = audio.len(), language, "Recognizing speech");
        let req = self
            .stt
            .request(Method::POST, &recognition_path(language)?)
            .header(CONTENT_TYPE, WAV_CONTENT_TYPE)
            .header("Accept", "application/json")
            .body(audio);
        let resp = self.stt.send("recognize speech", req).await?;
        let body: RecognitionResponse = self.stt.read_json("recognize speech", resp).await?;
        let outcome = RecognitionOutcome::from_response(body);
        if let RecognitionOutcome::Canceled { reason } = &outcome {
            warn!(reason = %reason, "Recognition canceled");
        }
        Ok(outcome)
    }

    /// Fast transcription of a whole file.
    pub async fn transcribe(&self, audio: Bytes, locales: &[String]) -> CogResult<Transcription> {
        if audio.is_empty() {
            return Err(CogError::invalid_request("audio payload is empty"));
        }
        let definition = serde_json::to_string(&TranscriptionDefinition { locales })
            .map_err(|e| CogError::Other(e.into()))?;
        let audio_part = Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| CogError::invalid_request(e.to_string()))?;
        let form = Form::new()
            .part("audio", audio_part)
            .text("definition", definition);
        info!(bytes = audio.len(), locales = ?locales, "Transcribing audio");
        let resp = self
            .api
            .post_multipart_response(
                "transcribe audio",
                &format!("/speechtotext/transcriptions:transcribe?api-version={TRANSCRIPTION_API_VERSION}"),
                form,
            )
            .await?;
        self.api.read_json("transcribe audio", resp).await
    }

    pub async fn identify_language(
        &self,
        audio: Bytes,
        candidates: &[String],
    ) -> CogResult<LanguageIdentification> {
        if candidates.is_empty() {
            return Err(CogError::invalid_request(
                "at least one candidate locale is required",
            ));
        }
        let transcription = self.transcribe(audio, candidates).await?;
        let language = transcription.phrases.first().and_then(|p| p.locale.clone());
        Ok(LanguageIdentification {
            text: transcription.text(),
            language,
        })
    }
}

#[async_trait]
impl Analyzer for SpeechRecognizer {
    type Output = RecognitionOutcome;

    fn service(&self) -> &str {
        SERVICE_NAME
    }

    fn accepts(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::Audio
    }

    async fn analyze(&self, payload: RequestPayload) -> CogResult<RecognitionOutcome> {
        self.check(&payload)?;
        match payload {
            RequestPayload::Audio(audio) => self.recognize(audio, &self.language).await,
            _ => Err(CogError::invalid_request("expected an audio payload")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn recognition_language_must_be_a_locale() {
        assert!(recognition_path("en-US").unwrap().contains("language=en-US&format=detailed"));
        assert!(recognition_path("en-US&format=simple").is_err());
    }

    fn recognizer(server: &MockServer) -> SpeechRecognizer {
        SpeechRecognizer::new(&SpeechEndpoints::single(&server.uri()), "k", None).unwrap()
    }

    fn wav() -> Bytes {
        Bytes::from_static(b"RIFF\x24\x00\x00\x00WAVEfmt ")
    }

    async fn mount_recognition(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/speech/recognition/conversation/cognitiveservices/v1"))
            .and(query_param("language", "en-US"))
            .and(query_param("format", "detailed"))
            .and(header("Content-Type", WAV_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn recognized_speech() {
        let server = MockServer::start().await;
        mount_recognition(
            &server,
            json!({
                "RecognitionStatus": "Success",
                "DisplayText": "What's the weather like?",
                "NBest": [{"Confidence": 0.93, "Display": "What's the weather like?"}]
            }),
        )
        .await;

        let outcome = recognizer(&server)
            .analyze(RequestPayload::Audio(wav()))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            RecognitionOutcome::Recognized {
                text: "What's the weather like?".to_string(),
                confidence: Some(0.93)
            }
        );
    }

    #[tokio::test]
    async fn no_match_and_canceled() {
        let server = MockServer::start().await;
        mount_recognition(&server, json!({"RecognitionStatus": "NoMatch"})).await;
        let outcome = recognizer(&server).recognize(wav(), "en-US").await.unwrap();
        assert_eq!(outcome, RecognitionOutcome::NoMatch);

        let server = MockServer::start().await;
        mount_recognition(&server, json!({"RecognitionStatus": "InitialSilenceTimeout"})).await;
        let outcome = recognizer(&server).recognize(wav(), "en-US").await.unwrap();
        assert_eq!(
            outcome,
            RecognitionOutcome::Canceled {
                reason: "InitialSilenceTimeout".to_string()
            }
        );
        assert!(outcome.text().is_none());
    }

    #[tokio::test]
    async fn transcription_identifies_language() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speechtotext/transcriptions:transcribe"))
            .and(query_param("api-version", TRANSCRIPTION_API_VERSION))
            .and(body_string_contains("name=\"definition\""))
            .and(body_string_contains("\"locales\":[\"en-US\",\"es-ES\",\"fr-FR\"]"))
            .and(body_string_contains("name=\"audio\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "durationMilliseconds": 2100,
                "combinedPhrases": [{"text": "Hola, ¿cómo estás?"}],
                "phrases": [{
                    "offsetMilliseconds": 80,
                    "durationMilliseconds": 1900,
                    "text": "Hola, ¿cómo estás?",
                    "locale": "es-ES",
                    "confidence": 0.88
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let candidates: Vec<String> = DEFAULT_CANDIDATE_LOCALES.iter().map(|l| l.to_string()).collect();
        let identified = recognizer(&server)
            .identify_language(wav(), &candidates)
            .await
            .unwrap();
        assert_eq!(identified.language.as_deref(), Some("es-ES"));
        assert_eq!(identified.text, "Hola, ¿cómo estás?");
    }

    #[tokio::test]
    async fn empty_audio_is_rejected() {
        let server = MockServer::start().await;
        let err = recognizer(&server).recognize(Bytes::new(), "en-US").await.unwrap_err();
        assert!(matches!(err, CogError::InvalidRequest(_)));
    }
}
