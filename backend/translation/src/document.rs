//! Document translation: synchronous single-file and asynchronous batch jobs.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use cogforge_core::{
    operation_location, CogError, CogResult, OperationState, ServiceClient, ServiceCredentials,
};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SERVICE_NAME: &str = "DocumentTranslation";
pub const API_VERSION: &str = "2024-05-01";

pub const DEFAULT_TARGET_LANGUAGE: &str = "es";
pub const SAMPLE_DOCUMENT_PATH: &str = "TestData/test-input.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInput {
    pub source_url: String,
    #[serde(default = "azure_blob")]
    pub storage_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInput {
    pub target_url: String,
    #[serde(default = "azure_blob")]
    pub storage_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub language: String,
}

fn azure_blob() -> String {
    "AzureBlob".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInput {
    pub source: SourceInput,
    pub targets: Vec<TargetInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub inputs: Vec<BatchInput>,
}

impl BatchRequest {
    /// One blob container translated into one target language.
    pub fn single(
        source_url: impl Into<String>,
        source_language: Option<String>,
        target_url: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            inputs: vec![BatchInput {
                source: SourceInput {
                    source_url: source_url.into(),
                    storage_source: azure_blob(),
                    language: source_language,
                },
                targets: vec![TargetInput {
                    target_url: target_url.into(),
                    storage_source: azure_blob(),
                    category: Some("general".to_string()),
                    language: target_language.into(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: u64,
    pub failed: u64,
    pub success: u64,
    pub in_progress: u64,
    pub not_yet_started: u64,
    pub cancelled: u64,
    #[serde(default)]
    pub total_character_charged: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatus {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub created_date_time_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_action_date_time_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: StatusSummary,
}

impl BatchStatus {
    pub fn state(&self) -> OperationState {
        OperationState::from_status(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct DocumentTranslationClient {
    http: ServiceClient,
}

impl DocumentTranslationClient {
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

    /// Translate one file and return the translated bytes.
    pub async fn translate_document(
        &self,
        document: Bytes,
        file_name: &str,
        content_type: &str,
        target_language: &str,
    ) -> CogResult<Bytes> {
        if document.is_empty() {
            return Err(CogError::invalid_request("document payload is empty"));
        }
        if target_language.trim().is_empty() {
            return Err(CogError::invalid_request("target language is required"));
        }
        let part = Part::bytes(document.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                CogError::invalid_request(format!("invalid content type '{content_type}': {e}"))
            })?;
        let form = Form::new().part("document", part);
        info!(file = file_name, bytes = document.len(), target = target_language, "Translating document");
        let resp = self
            .http
            .post_multipart_response(
                "translate document",
                &format!(
                    "/translator/document:translate?targetLanguage={target_language}&api-version={API_VERSION}"
                ),
                form,
            )
            .await?;
        self.http.read_bytes("translate document", resp).await
    }

    /// Submit a batch job and return its status URL.
    pub async fn start_batch(&self, request: &BatchRequest) -> CogResult<String> {
        if request.inputs.is_empty() || request.inputs.iter().any(|i| i.targets.is_empty()) {
            return Err(CogError::invalid_request(
                "every batch input needs at least one target",
            ));
        }
        let resp = self
            .http
            .post_json_response(
                "start translation batch",
                &format!("/translator/document/batches?api-version={API_VERSION}"),
                request,
            )
            .await?;
        let location = operation_location("start translation batch", &resp)?;
        info!(location = %location, "Translation batch accepted");
        Ok(location)
    }

    pub async fn batch_status(&self, status_url: &str) -> CogResult<BatchStatus> {
        self.http.get_json("translation batch status", status_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn translates_single_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translator/document:translate"))
            .and(query_param("targetLanguage", "es"))
            .and(query_param("api-version", API_VERSION))
            .and(header("Ocp-Apim-Subscription-Key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Hola mundo</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = DocumentTranslationClient::new(&server.uri(), "k").unwrap();
        let translated = client
            .translate_document(
                Bytes::from_static(b"<p>Hello world</p>"),
                "test-input.txt",
                "text/html",
                DEFAULT_TARGET_LANGUAGE,
            )
            .await
            .unwrap();
        assert_eq!(&translated[..], b"<p>Hola mundo</p>");
    }

    #[tokio::test]
    async fn batch_is_started_and_polled() {
        let server = MockServer::start().await;
        let location = format!("{}/translator/document/batches/job-1", server.uri());
        Mock::given(method("POST"))
            .and(path("/translator/document/batches"))
            .and(body_partial_json(json!({
                "inputs": [{"source": {"storageSource": "AzureBlob", "language": "en"},
                            "targets": [{"language": "es", "category": "general"}]}]
            })))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Operation-Location", location.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/translator/document/batches/job-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "job-1",
                "createdDateTimeUtc": "2024-05-01T10:00:00Z",
                "lastActionDateTimeUtc": "2024-05-01T10:00:05Z",
                "status": "Running",
                "summary": {"total": 2, "failed": 0, "success": 1, "inProgress": 1,
                            "notYetStarted": 0, "cancelled": 0, "totalCharacterCharged": 120}
            })))
            .mount(&server)
            .await;

        let client = DocumentTranslationClient::new(&server.uri(), "k").unwrap();
        let request = BatchRequest::single(
            "https://src.blob.example/in?sv=1&sig=abc",
            Some("en".to_string()),
            "https://dst.blob.example/out?sv=1&sig=def",
            "es",
        );
        let url = client.start_batch(&request).await.unwrap();
        assert_eq!(url, location);

        let status = client.batch_status(&url).await.unwrap();
        assert_eq!(status.state(), OperationState::Running);
        assert_eq!(status.summary.success, 1);
        assert!(status.created_date_time_utc.is_some());
    }

    #[tokio::test]
    async fn batch_without_targets_is_rejected() {
        let client = DocumentTranslationClient::new("https://dt.example", "k").unwrap();
        let mut request = BatchRequest::single("https://a", None, "https://b", "es");
        request.inputs[0].targets.clear();
        let err = client.start_batch(&request).await.unwrap_err();
        assert!(matches!(err, CogError::InvalidRequest(_)));
    }
}
