//! Asynchronous analyze calls against the prebuilt document models.

use std::time::Duration;

use bytes::Bytes;
use cogforge_core::{
    operation_location, CogError, CogResult, PollOptions, ServiceClient, ServiceCredentials,
};
use serde::Serialize;
use tracing::info;

use crate::models::{AnalyzeOperation, AnalyzeResult};

pub const SERVICE_NAME: &str = "DocumentIntelligence";
pub const API_VERSION: &str = "2023-07-31";

pub const INVOICE_MODEL: &str = "prebuilt-invoice";
pub const ID_DOCUMENT_MODEL: &str = "prebuilt-idDocument";

#[derive(Debug, Clone)]
pub struct DocumentIntelligenceClient {
    http: ServiceClient,
    poll: PollOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UrlSource<'a> {
    url_source: &'a str,
}

pub fn analyze_path(model_id: &str) -> String {
    format!("/formrecognizer/documentModels/{model_id}:analyze?api-version={API_VERSION}")
}

impl DocumentIntelligenceClient {
    pub fn new(endpoint: &str, api_key: &str) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::new(SERVICE_NAME, endpoint, api_key)?,
            poll: PollOptions::default(),
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::from_credentials(SERVICE_NAME, credentials)?,
            poll: PollOptions::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Analyze a publicly reachable document.
    pub async fn analyze_url(&self, model_id: &str, url: &str) -> CogResult<AnalyzeResult> {
        if url.trim().is_empty() {
            return Err(CogError::invalid_request("document URL is empty"));
        }
        info!(model = model_id, url, "Submitting document URL");
        let resp = self
            .http
            .post_json_response(
                "submit document",
                &analyze_path(model_id),
                &UrlSource { url_source: url },
            )
            .await?;
        let location = operation_location("submit document", &resp)?;
        self.wait(&location).await
    }

    /// Analyze an uploaded document.
    pub async fn analyze_bytes(&self, model_id: &str, document: Bytes) -> CogResult<AnalyzeResult> {
        if document.is_empty() {
            return Err(CogError::invalid_request("document payload is empty"));
        }
        info!(model = model_id, bytes = document.len(), "Submitting document");
        let resp = self
            .http
            .post_bytes_response(
                "submit document",
                &analyze_path(model_id),
                document,
                "application/octet-stream",
            )
            .await?;
        let location = operation_location("submit document", &resp)?;
        self.wait(&location).await
    }

    async fn wait(&self, location: &str) -> CogResult<AnalyzeResult> {
        let done: AnalyzeOperation = self
            .http
            .poll_operation("analyze document", location, self.poll)
            .await?;
        let result = done.analyze_result.ok_or_else(|| CogError::Decode {
            operation: "analyze document".to_string(),
            message: "succeeded operation carries no analyzeResult".to_string(),
        })?;
        info!(documents = result.documents.len(), "Document analyzed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast() -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(10),
            max_wait: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn submits_url_and_polls_result() {
        let server = MockServer::start().await;
        let location = format!("{}/formrecognizer/documentModels/prebuilt-invoice/analyzeResults/abc", server.uri());
        Mock::given(method("POST"))
            .and(path("/formrecognizer/documentModels/prebuilt-invoice:analyze"))
            .and(query_param("api-version", API_VERSION))
            .and(header("Ocp-Apim-Subscription-Key", "k"))
            .and(body_json(json!({"urlSource": "https://docs.example/invoice.pdf"})))
            .respond_with(ResponseTemplate::new(202).insert_header("Operation-Location", location.as_str()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/formrecognizer/documentModels/prebuilt-invoice/analyzeResults/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/formrecognizer/documentModels/prebuilt-invoice/analyzeResults/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "succeeded",
                "analyzeResult": {
                    "modelId": "prebuilt-invoice",
                    "documents": [{
                        "docType": "invoice",
                        "fields": {
                            "VendorName": {"type": "string", "valueString": "CONTOSO LTD.", "confidence": 0.93}
                        }
                    }]
                }
            })))
            .mount(&server)
            .await;

        let client = DocumentIntelligenceClient::new(&server.uri(), "k")
            .unwrap()
            .with_poll_options(fast());
        let result = client
            .analyze_url(INVOICE_MODEL, "https://docs.example/invoice.pdf")
            .await
            .unwrap();
        assert_eq!(result.documents.len(), 1);
        let vendor = &result.documents[0].fields["VendorName"];
        assert_eq!(vendor.as_string(), Some("CONTOSO LTD."));
    }

    #[tokio::test]
    async fn missing_operation_location_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let client = DocumentIntelligenceClient::new(&server.uri(), "k").unwrap();
        let err = client
            .analyze_bytes(ID_DOCUMENT_MODEL, Bytes::from_static(b"%PDF"))
            .await
            .unwrap_err();
        assert!(matches!(err, CogError::Decode { .. }));
    }

    #[tokio::test]
    async fn rejected_submission_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": "401", "message": "Access denied due to invalid subscription key."}
            })))
            .mount(&server)
            .await;

        let client = DocumentIntelligenceClient::new(&server.uri(), "bad").unwrap();
        let err = client
            .analyze_url(INVOICE_MODEL, "https://docs.example/invoice.pdf")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn empty_document_is_rejected_locally() {
        let client = DocumentIntelligenceClient::new("https://di.example", "k").unwrap();
        let err = client
            .analyze_bytes(ID_DOCUMENT_MODEL, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CogError::InvalidRequest(_)));
    }
}
