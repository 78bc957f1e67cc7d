//! Text translation and language detection (Translator v3.0).

use std::time::Duration;

use async_trait::async_trait;
use cogforge_core::{
    query_token, Analyzer, CogError, CogResult, PayloadKind, RequestPayload, ServiceClient,
    ServiceCredentials,
};
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub const SERVICE_NAME: &str = "Translator";
pub const API_VERSION: &str = "3.0";
pub const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";
pub const CLIENT_TRACE_ID_HEADER: &str = "X-ClientTraceId";

pub const DEFAULT_FROM: &str = "en";
pub const DEFAULT_TO: [&str; 2] = ["fr", "zu"];
pub const SAMPLE_TEXT: &str =
    "I would really like to drive your car around the block a few times!";

#[derive(Serialize)]
struct TextItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    pub language: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub to: String,
}

/// One input text with its translations, in target order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    #[serde(default)]
    pub detected_language: Option<DetectedLanguage>,
    pub translations: Vec<Translation>,
}

impl TranslationResult {
    pub fn text_for(&self, language: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.to.eq_ignore_ascii_case(language))
            .map(|t| t.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetection {
    pub language: String,
    pub score: f64,
    #[serde(default)]
    pub is_translation_supported: bool,
    #[serde(default)]
    pub is_transliteration_supported: bool,
    #[serde(default)]
    pub alternatives: Vec<LanguageDetection>,
}

/// Build `/translate?api-version=3.0&from=..&to=..&to=..`.
pub fn translate_path(from: Option<&str>, to: &[String]) -> CogResult<String> {
    let mut path = format!("/translate?api-version={API_VERSION}");
    if let Some(from) = from.filter(|f| !f.is_empty()) {
        path.push_str("&from=");
        path.push_str(query_token("source language", from)?);
    }
    for target in to {
        path.push_str("&to=");
        path.push_str(query_token("target language", target)?);
    }
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct Translator {
    http: ServiceClient,
    from: Option<String>,
    to: Vec<String>,
}

impl Translator {
    pub fn new(endpoint: &str, api_key: &str) -> CogResult<Self> {
        Ok(Self::wrap(ServiceClient::new(SERVICE_NAME, endpoint, api_key)?))
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Ok(Self::wrap(ServiceClient::from_credentials(SERVICE_NAME, credentials)?))
    }

    fn wrap(http: ServiceClient) -> Self {
        Self {
            http,
            from: Some(DEFAULT_FROM.to_string()),
            to: DEFAULT_TO.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.http = self.http.with_region(region);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Languages used by [`Analyzer::analyze`]. `None` lets the service detect the source.
    pub fn with_languages(mut self, from: Option<String>, to: Vec<String>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        texts: &[String],
    ) -> CogResult<T> {
        if texts.is_empty() || texts.iter().all(|t| t.trim().is_empty()) {
            return Err(CogError::invalid_request("no text to send"));
        }
        let body: Vec<TextItem<'_>> = texts.iter().map(|t| TextItem { text: t }).collect();
        let trace_id = Uuid::new_v4().to_string();
        let req = self
            .http
            .request(Method::POST, path)
            .header(CLIENT_TRACE_ID_HEADER, &trace_id)
            .json(&body);
        info!(operation, texts = texts.len(), trace_id = %trace_id, "Calling translator");
        let resp = self.http.send(operation, req).await?;
        self.http.read_json(operation, resp).await
    }

    pub async fn translate(
        &self,
        texts: &[String],
        from: Option<&str>,
        to: &[String],
    ) -> CogResult<Vec<TranslationResult>> {
        if to.is_empty() {
            return Err(CogError::invalid_request(
                "at least one target language is required",
            ));
        }
        self.call("translate text", &translate_path(from, to)?, texts)
            .await
    }

    pub async fn detect(&self, texts: &[String]) -> CogResult<Vec<LanguageDetection>> {
        self.call(
            "detect language",
            &format!("/detect?api-version={API_VERSION}"),
            texts,
        )
        .await
    }
}

#[async_trait]
impl Analyzer for Translator {
    type Output = Vec<TranslationResult>;

    fn service(&self) -> &str {
        SERVICE_NAME
    }

    fn accepts(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::Text
    }

    async fn analyze(&self, payload: RequestPayload) -> CogResult<Vec<TranslationResult>> {
        self.check(&payload)?;
        match payload {
            RequestPayload::Text(text) => {
                self.translate(&[text], self.from.as_deref(), &self.to).await
            }
            _ => Err(CogError::invalid_request("expected a text payload")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn path_repeats_targets() {
        let to = vec!["fr".to_string(), "zu".to_string()];
        assert_eq!(
            translate_path(Some("en"), &to).unwrap(),
            "/translate?api-version=3.0&from=en&to=fr&to=zu"
        );
        assert_eq!(
            translate_path(None, &to[..1]).unwrap(),
            "/translate?api-version=3.0&to=fr"
        );
    }

    #[test]
    fn path_rejects_query_breaking_languages() {
        let err = translate_path(Some("en&to=xx"), &["fr".to_string()]).unwrap_err();
        assert!(matches!(err, CogError::InvalidRequest(_)));
        assert!(translate_path(None, &["fr#x".to_string()]).is_err());
    }

    #[tokio::test]
    async fn translates_with_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(query_param("api-version", "3.0"))
            .and(query_param("from", "en"))
            .and(header("Ocp-Apim-Subscription-Key", "k"))
            .and(header("Ocp-Apim-Subscription-Region", "westeurope"))
            .and(header_exists(CLIENT_TRACE_ID_HEADER))
            .and(body_json(json!([{"Text": SAMPLE_TEXT}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "translations": [
                    {"text": "J'aimerais vraiment conduire votre voiture autour du pâté de maisons plusieurs fois!", "to": "fr"},
                    {"text": "Ngingathanda ngempela ukushayela imoto yakho endaweni evimbelayo izikhathi ezimbalwa!", "to": "zu"}
                ]
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let translator = Translator::new(&server.uri(), "k")
            .unwrap()
            .with_region("westeurope");
        let results = translator
            .analyze(RequestPayload::text(SAMPLE_TEXT))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].translations.len(), 2);
        assert!(results[0].text_for("FR").unwrap().starts_with("J'aimerais"));
    }

    #[tokio::test]
    async fn empty_targets_are_rejected_without_io() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let translator = Translator::new(&server.uri(), "k").unwrap();
        let err = translator
            .translate(&[SAMPLE_TEXT.to_string()], Some("en"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CogError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn detects_language() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "language": "de",
                "score": 1.0,
                "isTranslationSupported": true,
                "isTransliterationSupported": false
            }])))
            .mount(&server)
            .await;

        let translator = Translator::new(&server.uri(), "k").unwrap();
        let detected = translator
            .detect(&["Ich würde wirklich gern Ihr Auto fahren.".to_string()])
            .await
            .unwrap();
        assert_eq!(detected[0].language, "de");
        assert!(detected[0].is_translation_supported);
    }
}
