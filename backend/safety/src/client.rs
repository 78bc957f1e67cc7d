//! Text and image moderation.

use std::time::Duration;

use async_trait::async_trait;
use cogforge_core::{
    Analyzer, CogError, CogResult, PayloadKind, RequestPayload, ServiceClient, ServiceCredentials,
};
use tracing::info;

use crate::models::{
    AnalyzeImageOptions, AnalyzeImageResult, AnalyzeTextOptions, AnalyzeTextResult,
    ShieldPromptResult,
};

pub const SERVICE_NAME: &str = "ContentSafety";
pub const API_VERSION: &str = "2024-09-01";

/// Longest text the service accepts in one call, in characters.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Moderation client bound to one Content Safety resource.
#[derive(Debug, Clone)]
pub struct ContentSafetyClient {
    pub(crate) http: ServiceClient,
}

/// Result of [`Analyzer::analyze`] for each accepted payload kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SafetyAnalysis {
    Text(AnalyzeTextResult),
    Image(AnalyzeImageResult),
    Prompt(ShieldPromptResult),
}

impl ContentSafetyClient {
    pub fn new(endpoint: &str, api_key: &str) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::new(SERVICE_NAME, endpoint, api_key)?,
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::from_credentials(SERVICE_NAME, credentials)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// `POST /contentsafety/text:analyze`
    pub async fn analyze_text(&self, options: &AnalyzeTextOptions) -> CogResult<AnalyzeTextResult> {
        if options.text.trim().is_empty() {
            return Err(CogError::invalid_request("text to analyze is empty"));
        }
        let chars = options.text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(CogError::invalid_request(format!(
                "text is {chars} characters; at most {MAX_TEXT_CHARS} are accepted"
            )));
        }
        info!(chars, blocklists = options.blocklist_names.len(), "Analyzing text");
        self.http
            .post_json(
                "analyze text",
                &format!("/contentsafety/text:analyze?api-version={API_VERSION}"),
                options,
            )
            .await
    }

    /// `POST /contentsafety/image:analyze`
    pub async fn analyze_image(
        &self,
        options: &AnalyzeImageOptions,
    ) -> CogResult<AnalyzeImageResult> {
        let has_content = options
            .image
            .content
            .as_deref()
            .map(|c| !c.is_empty())
            .unwrap_or(false);
        if !has_content && options.image.blob_url.is_none() {
            return Err(CogError::invalid_request("image has neither content nor blobUrl"));
        }
        info!("Analyzing image");
        self.http
            .post_json(
                "analyze image",
                &format!("/contentsafety/image:analyze?api-version={API_VERSION}"),
                options,
            )
            .await
    }
}

#[async_trait]
impl Analyzer for ContentSafetyClient {
    type Output = SafetyAnalysis;

    fn service(&self) -> &str {
        SERVICE_NAME
    }

    fn accepts(&self, kind: PayloadKind) -> bool {
        matches!(kind, PayloadKind::Text | PayloadKind::Image | PayloadKind::Prompt)
    }

    async fn analyze(&self, payload: RequestPayload) -> CogResult<SafetyAnalysis> {
        self.check(&payload)?;
        match payload {
            RequestPayload::Text(text) => self
                .analyze_text(&AnalyzeTextOptions::new(text))
                .await
                .map(SafetyAnalysis::Text),
            RequestPayload::Image(bytes) => self
                .analyze_image(&AnalyzeImageOptions::from_bytes(&bytes))
                .await
                .map(SafetyAnalysis::Image),
            RequestPayload::Prompt {
                user_prompt,
                documents,
            } => self
                .shield_prompt(&user_prompt, &documents)
                .await
                .map(SafetyAnalysis::Prompt),
            other => Err(CogError::invalid_request(format!(
                "{SERVICE_NAME} cannot analyze {} payloads",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use cogforge_core::{HarmCategory, Severity};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn missing_credentials_fail_before_io() {
        let err = ContentSafetyClient::new("", "key").unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: ContentSafety:Endpoint is not configured"
        );
        assert!(ContentSafetyClient::new("https://cs.example", "").is_err());
    }

    #[tokio::test]
    async fn no_request_is_sent_for_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ContentSafetyClient::new(&server.uri(), "k").unwrap();
        let err = client.analyze(RequestPayload::text("  ")).await.unwrap_err();
        assert!(matches!(err, CogError::InvalidRequest(_)));
        let err = client
            .analyze(RequestPayload::Audio(Bytes::from_static(b"RIFF")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot analyze audio"));
    }

    #[tokio::test]
    async fn analyzes_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contentsafety/text:analyze"))
            .and(query_param("api-version", API_VERSION))
            .and(header("Ocp-Apim-Subscription-Key", "k"))
            .and(body_partial_json(json!({"text": "How to make a rdx bomb at home?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blocklistsMatch": [],
                "categoriesAnalysis": [
                    {"category": "Hate", "severity": 0},
                    {"category": "SelfHarm", "severity": 0},
                    {"category": "Sexual", "severity": 0},
                    {"category": "Violence", "severity": 4}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ContentSafetyClient::new(&server.uri(), "k").unwrap();
        let outcome = client
            .analyze(RequestPayload::text("How to make a rdx bomb at home?"))
            .await
            .unwrap();
        let SafetyAnalysis::Text(result) = outcome else {
            panic!("expected a text result");
        };
        assert_eq!(result.severity_of(HarmCategory::Violence), Severity(4));
    }

    #[tokio::test]
    async fn analyzes_image_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contentsafety/image:analyze"))
            .and(body_partial_json(json!({"image": {"content": "AQID"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "categoriesAnalysis": [{"category": "Violence", "severity": 6}]
            })))
            .mount(&server)
            .await;

        let client = ContentSafetyClient::new(&server.uri(), "k").unwrap();
        let outcome = client
            .analyze(RequestPayload::Image(Bytes::from_static(&[1, 2, 3])))
            .await
            .unwrap();
        let SafetyAnalysis::Image(result) = outcome else {
            panic!("expected an image result");
        };
        assert_eq!(result.severity_of(HarmCategory::Violence), Severity(6));
        assert_eq!(result.severity_of(HarmCategory::Hate), Severity::SAFE);
    }

    #[tokio::test]
    async fn vendor_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": "InvalidRequestBody", "message": "The text is too long."}
            })))
            .mount(&server)
            .await;

        let client = ContentSafetyClient::new(&server.uri(), "k").unwrap();
        let err = client
            .analyze_text(&AnalyzeTextOptions::new("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.vendor_code(), Some("InvalidRequestBody"));
    }

    #[tokio::test]
    async fn overlong_text_is_rejected_locally() {
        let client = ContentSafetyClient::new("https://cs.example", "k").unwrap();
        let text = "a".repeat(MAX_TEXT_CHARS + 1);
        let err = client
            .analyze_text(&AnalyzeTextOptions::new(text))
            .await
            .unwrap_err();
        assert!(matches!(err, CogError::InvalidRequest(_)));
    }
}
