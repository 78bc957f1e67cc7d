//! Speech translation: recognize an utterance, then translate the text.

use bytes::Bytes;
use cogforge_core::CogResult;
use cogforge_translation::{Translation, Translator};
use serde::Serialize;
use tracing::info;

use crate::recognition::{RecognitionOutcome, SpeechRecognizer};

pub const DEFAULT_SOURCE_LANGUAGE: &str = "en-US";
pub const DEFAULT_TARGET_LANGUAGES: [&str; 2] = ["fr", "de"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SpeechTranslationOutcome {
    Translated {
        recognized: String,
        translations: Vec<Translation>,
    },
    NoMatch,
    Canceled {
        reason: String,
    },
}

/// Language subtag of a locale: `en-US` → `en`.
pub fn language_of(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

#[derive(Debug, Clone)]
pub struct SpeechTranslator {
    recognizer: SpeechRecognizer,
    translator: Translator,
}

impl SpeechTranslator {
    pub fn new(recognizer: SpeechRecognizer, translator: Translator) -> Self {
        Self {
            recognizer,
            translator,
        }
    }

    pub async fn translate_speech(
        &self,
        audio: Bytes,
        source_locale: &str,
        targets: &[String],
    ) -> CogResult<SpeechTranslationOutcome> {
        let text = match self.recognizer.recognize(audio, source_locale).await? {
            RecognitionOutcome::Recognized { text, .. } => text,
            RecognitionOutcome::NoMatch => return Ok(SpeechTranslationOutcome::NoMatch),
            RecognitionOutcome::Canceled { reason } => {
                return Ok(SpeechTranslationOutcome::Canceled { reason })
            }
        };
        info!(targets = ?targets, "Translating recognized speech");
        let mut results = self
            .translator
            .translate(&[text.clone()], Some(language_of(source_locale)), targets)
            .await?;
        let translations = if results.is_empty() {
            Vec::new()
        } else {
            results.swap_remove(0).translations
        };
        Ok(SpeechTranslationOutcome::Translated {
            recognized: text,
            translations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::SpeechEndpoints;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn targets() -> Vec<String> {
        DEFAULT_TARGET_LANGUAGES.iter().map(|t| t.to_string()).collect()
    }

    fn translator_for(speech: &MockServer, text: &MockServer) -> SpeechTranslator {
        let recognizer =
            SpeechRecognizer::new(&SpeechEndpoints::single(&speech.uri()), "sk", None).unwrap();
        let translator = Translator::new(&text.uri(), "tk").unwrap();
        SpeechTranslator::new(recognizer, translator)
    }

    #[tokio::test]
    async fn recognized_text_is_translated() {
        let speech = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech/recognition/conversation/cognitiveservices/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "RecognitionStatus": "Success",
                "DisplayText": "Good morning."
            })))
            .mount(&speech)
            .await;
        let text = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(query_param("from", "en"))
            .and(body_json(json!([{"Text": "Good morning."}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "translations": [
                    {"text": "Bonjour.", "to": "fr"},
                    {"text": "Guten Morgen.", "to": "de"}
                ]
            }])))
            .expect(1)
            .mount(&text)
            .await;

        let outcome = translator_for(&speech, &text)
            .translate_speech(Bytes::from_static(b"RIFF"), DEFAULT_SOURCE_LANGUAGE, &targets())
            .await
            .unwrap();
        let SpeechTranslationOutcome::Translated { recognized, translations } = outcome else {
            panic!("expected a translation");
        };
        assert_eq!(recognized, "Good morning.");
        assert_eq!(translations[1].text, "Guten Morgen.");
    }

    #[tokio::test]
    async fn no_match_skips_translation() {
        let speech = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"RecognitionStatus": "NoMatch"})))
            .mount(&speech)
            .await;
        let text = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&text)
            .await;

        let outcome = translator_for(&speech, &text)
            .translate_speech(Bytes::from_static(b"RIFF"), DEFAULT_SOURCE_LANGUAGE, &targets())
            .await
            .unwrap();
        assert_eq!(outcome, SpeechTranslationOutcome::NoMatch);
    }

    #[test]
    fn language_subtag() {
        assert_eq!(language_of("en-US"), "en");
        assert_eq!(language_of("fr"), "fr");
    }
}
