//! Custom Vision prediction against a published iteration.

use std::time::Duration;

use bytes::Bytes;
use cogforge_core::{CogError, CogResult, ServiceClient, ServiceCredentials};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SERVICE_NAME: &str = "CustomVision";
pub const PREDICTION_KEY_HEADER: &str = "Prediction-Key";

/// Which model head a project was trained for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    Classify,
    Detect,
}

impl PredictionKind {
    fn path_segment(self) -> &'static str {
        match self {
            Self::Classify => "classify",
            Self::Detect => "detect",
        }
    }
}

/// Normalized (0..1) region of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub probability: f64,
    #[serde(default)]
    pub tag_id: Option<String>,
    pub tag_name: String,
    /// Only set for object detection.
    #[serde(default)]
    pub bounding_box: Option<NormalizedBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePrediction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub iteration: Option<String>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone)]
pub struct CustomVisionClient {
    http: ServiceClient,
}

fn check_segment(what: &str, value: &str) -> CogResult<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CogError::invalid_request(format!("invalid {what} '{value}'")))
    }
}

pub fn prediction_path(
    kind: PredictionKind,
    project_id: &str,
    published_name: &str,
) -> CogResult<String> {
    check_segment("project id", project_id)?;
    check_segment("published iteration name", published_name)?;
    Ok(format!(
        "/customvision/v3.0/Prediction/{project_id}/{}/iterations/{published_name}/image",
        kind.path_segment()
    ))
}

impl CustomVisionClient {
    pub fn new(prediction_endpoint: &str, prediction_key: &str) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::new(SERVICE_NAME, prediction_endpoint, prediction_key)?
                .with_key_header(PREDICTION_KEY_HEADER),
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::from_credentials(SERVICE_NAME, credentials)?
                .with_key_header(PREDICTION_KEY_HEADER),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub async fn classify_image(
        &self,
        project_id: &str,
        published_name: &str,
        image: Bytes,
    ) -> CogResult<ImagePrediction> {
        self.predict(PredictionKind::Classify, project_id, published_name, image)
            .await
    }

    pub async fn detect_image(
        &self,
        project_id: &str,
        published_name: &str,
        image: Bytes,
    ) -> CogResult<ImagePrediction> {
        self.predict(PredictionKind::Detect, project_id, published_name, image)
            .await
    }

    async fn predict(
        &self,
        kind: PredictionKind,
        project_id: &str,
        published_name: &str,
        image: Bytes,
    ) -> CogResult<ImagePrediction> {
        let path = prediction_path(kind, project_id, published_name)?;
        if image.is_empty() {
            return Err(CogError::invalid_request("image payload is empty"));
        }
        let operation = match kind {
            PredictionKind::Classify => "classify image",
            PredictionKind::Detect => "detect objects",
        };
        let result: ImagePrediction = self
            .http
            .post_bytes(operation, &path, image, "application/octet-stream")
            .await?;
        info!(predictions = result.predictions.len(), "Prediction completed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn builds_prediction_path() {
        assert_eq!(
            prediction_path(PredictionKind::Detect, "8f1b", "CustomODModel").unwrap(),
            "/customvision/v3.0/Prediction/8f1b/detect/iterations/CustomODModel/image"
        );
        assert!(prediction_path(PredictionKind::Classify, "a/b", "x").is_err());
    }

    #[tokio::test]
    async fn sends_prediction_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customvision/v3.0/Prediction/proj/classify/iterations/treeClassModel/image"))
            .and(header(PREDICTION_KEY_HEADER, "pk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p1",
                "project": "proj",
                "iteration": "it",
                "predictions": [
                    {"probability": 0.987, "tagId": "t1", "tagName": "Hemlock"},
                    {"probability": 0.012, "tagId": "t2", "tagName": "Japanese Cherry"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CustomVisionClient::new(&server.uri(), "pk").unwrap();
        let result = client
            .classify_image("proj", "treeClassModel", Bytes::from_static(b"img"))
            .await
            .unwrap();
        assert_eq!(result.predictions[0].tag_name, "Hemlock");
        assert!(result.predictions[0].bounding_box.is_none());
    }
}
