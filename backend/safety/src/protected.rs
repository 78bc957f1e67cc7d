//! Protected material detection for text and code.

use cogforge_core::{CogError, CogResult};
use serde::Serialize;
use tracing::info;

use crate::client::{ContentSafetyClient, API_VERSION};
use crate::models::ProtectedMaterialResult;

/// Code detection is only available on the preview API.
pub const CODE_API_VERSION: &str = "2024-09-15-preview";

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct CodeBody<'a> {
    code: &'a str,
}

impl ContentSafetyClient {
    /// `POST /contentsafety/text:detectProtectedMaterial`
    pub async fn detect_protected_text(&self, text: &str) -> CogResult<ProtectedMaterialResult> {
        if text.trim().is_empty() {
            return Err(CogError::invalid_request("text to analyze is empty"));
        }
        info!(chars = text.chars().count(), "Detecting protected text");
        self.bounded()
            .http
            .post_json(
                "detect protected text",
                &format!("/contentsafety/text:detectProtectedMaterial?api-version={API_VERSION}"),
                &TextBody { text },
            )
            .await
    }

    /// `POST /contentsafety/text:detectProtectedMaterialForCode`
    pub async fn detect_protected_code(&self, code: &str) -> CogResult<ProtectedMaterialResult> {
        if code.trim().is_empty() {
            return Err(CogError::invalid_request("code to analyze is empty"));
        }
        info!(chars = code.chars().count(), "Detecting protected code");
        self.bounded()
            .http
            .post_json(
                "detect protected code",
                &format!(
                    "/contentsafety/text:detectProtectedMaterialForCode?api-version={CODE_API_VERSION}"
                ),
                &CodeBody { code },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{PROTECTED_CODE, PROTECTED_LYRICS};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn text_body_uses_text_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contentsafety/text:detectProtectedMaterial"))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(json!({"text": PROTECTED_LYRICS})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "protectedMaterialAnalysis": {"detected": true}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ContentSafetyClient::new(&server.uri(), "k").unwrap();
        let result = client.detect_protected_text(PROTECTED_LYRICS).await.unwrap();
        assert!(result.protected_material_analysis.detected);
    }

    #[tokio::test]
    async fn code_uses_preview_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contentsafety/text:detectProtectedMaterialForCode"))
            .and(query_param("api-version", CODE_API_VERSION))
            .and(body_json(json!({"code": PROTECTED_CODE})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "protectedMaterialAnalysis": {
                    "detected": true,
                    "codeCitations": [{
                        "license": "NOASSERTION",
                        "sourceUrls": ["https://github.com/kolejny-projekt-z-kck/game-/tree/f134099e2e2c3c5e9f1b2b4e0b7b1b1b1b1b1b1b/t1.py"]
                    }]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ContentSafetyClient::new(&server.uri(), "k").unwrap();
        let result = client.detect_protected_code(PROTECTED_CODE).await.unwrap();
        assert_eq!(result.protected_material_analysis.code_citations.len(), 1);
    }
}
