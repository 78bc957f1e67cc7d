//! Image Analysis 4.0: captions, OCR, objects, people, smart crops and tags.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cogforge_core::{
    query_token, Analyzer, CogError, CogResult, PayloadKind, RequestPayload, ServiceClient,
    ServiceCredentials,
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SERVICE_NAME: &str = "Vision";
pub const API_VERSION: &str = "2024-02-01";

/// Visual features that can be requested in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisualFeature {
    Caption,
    DenseCaptions,
    Objects,
    People,
    Read,
    SmartCrops,
    Tags,
}

impl VisualFeature {
    pub const ALL: [VisualFeature; 7] = [
        Self::Caption,
        Self::DenseCaptions,
        Self::Objects,
        Self::People,
        Self::Read,
        Self::SmartCrops,
        Self::Tags,
    ];

    /// Value used in the `features` query parameter.
    pub fn query_name(self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::DenseCaptions => "denseCaptions",
            Self::Objects => "objects",
            Self::People => "people",
            Self::Read => "read",
            Self::SmartCrops => "smartCrops",
            Self::Tags => "tags",
        }
    }

    /// Case-insensitive parse of a query name (`dense-captions` also accepted).
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.query_name().to_ascii_lowercase() == normalized)
    }
}

impl fmt::Display for VisualFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysisOptions {
    pub gender_neutral_caption: bool,
    pub language: Option<String>,
    pub smart_crops_aspect_ratios: Vec<f64>,
    pub model_version: Option<String>,
}

impl Default for ImageAnalysisOptions {
    fn default() -> Self {
        Self {
            gender_neutral_caption: true,
            language: None,
            smart_crops_aspect_ratios: Vec::new(),
            model_version: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{X={},Y={},Width={},Height={}}}", self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for ImagePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{X={},Y={}}}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResult {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenseCaption {
    pub text: String,
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedTag {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub tags: Vec<DetectedTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPerson {
    pub bounding_box: BoundingBox,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRegion {
    pub aspect_ratio: f64,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedTextWord {
    pub text: String,
    #[serde(default)]
    pub bounding_polygon: Vec<ImagePoint>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedTextLine {
    pub text: String,
    #[serde(default)]
    pub bounding_polygon: Vec<ImagePoint>,
    #[serde(default)]
    pub words: Vec<DetectedTextWord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedTextBlock {
    #[serde(default)]
    pub lines: Vec<DetectedTextLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResult {
    #[serde(default)]
    pub blocks: Vec<DetectedTextBlock>,
}

impl ReadResult {
    pub fn lines(&self) -> impl Iterator<Item = &DetectedTextLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }
}

/// `{ "values": [...] }` wrapper used by list-valued features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Values<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysisResult {
    pub model_version: String,
    pub metadata: ImageMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption_result: Option<CaptionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dense_captions_result: Option<Values<DenseCaption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects_result: Option<Values<DetectedObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people_result: Option<Values<DetectedPerson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_result: Option<ReadResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_crops_result: Option<Values<CropRegion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_result: Option<Values<DetectedTag>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ImageAnalysisClient {
    http: ServiceClient,
    default_features: Vec<VisualFeature>,
}

/// Query string for one analyze call.
pub fn analyze_path(features: &[VisualFeature], options: &ImageAnalysisOptions) -> CogResult<String> {
    if features.is_empty() {
        return Err(CogError::invalid_request(
            "At least one visual feature must be specified",
        ));
    }
    let mut features = features.to_vec();
    features.sort();
    features.dedup();
    let names: Vec<&str> = features.iter().map(|f| f.query_name()).collect();

    let mut path = format!(
        "/computervision/imageanalysis:analyze?api-version={API_VERSION}&features={}",
        names.join(",")
    );
    if options.gender_neutral_caption {
        path.push_str("&gender-neutral-caption=true");
    }
    if let Some(language) = &options.language {
        path.push_str(&format!("&language={}", query_token("language", language)?));
    }
    if !options.smart_crops_aspect_ratios.is_empty() {
        let ratios: Vec<String> = options
            .smart_crops_aspect_ratios
            .iter()
            .map(|r| format!("{r}"))
            .collect();
        path.push_str(&format!("&smartcrops-aspect-ratios={}", ratios.join(",")));
    }
    if let Some(model_version) = &options.model_version {
        path.push_str(&format!(
            "&model-version={}",
            query_token("model version", model_version)?
        ));
    }
    Ok(path)
}

impl ImageAnalysisClient {
    pub fn new(endpoint: &str, api_key: &str) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::new(SERVICE_NAME, endpoint, api_key)?,
            default_features: vec![VisualFeature::Caption, VisualFeature::Read],
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::from_credentials(SERVICE_NAME, credentials)?,
            default_features: vec![VisualFeature::Caption, VisualFeature::Read],
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Features requested by [`Analyzer::analyze`].
    pub fn with_default_features(mut self, features: Vec<VisualFeature>) -> Self {
        self.default_features = features;
        self
    }

    /// `POST /computervision/imageanalysis:analyze` with the image as octet-stream.
    pub async fn analyze_image(
        &self,
        image: Bytes,
        features: &[VisualFeature],
        options: &ImageAnalysisOptions,
    ) -> CogResult<ImageAnalysisResult> {
        let path = analyze_path(features, options)?;
        if image.is_empty() {
            return Err(CogError::invalid_request("image payload is empty"));
        }
        info!(bytes = image.len(), features = features.len(), "Analyzing image");
        self.http
            .post_bytes("analyze image", &path, image, "application/octet-stream")
            .await
    }
}

#[async_trait]
impl Analyzer for ImageAnalysisClient {
    type Output = ImageAnalysisResult;

    fn service(&self) -> &str {
        SERVICE_NAME
    }

    fn accepts(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::Image
    }

    async fn analyze(&self, payload: RequestPayload) -> CogResult<ImageAnalysisResult> {
        self.check(&payload)?;
        let RequestPayload::Image(image) = payload else {
            return Err(CogError::invalid_request("expected an image payload"));
        };
        self.analyze_image(image, &self.default_features, &ImageAnalysisOptions::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn empty_feature_set_is_rejected() {
        let err = analyze_path(&[], &ImageAnalysisOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid request: At least one visual feature must be specified"
        );
    }

    #[test]
    fn builds_query() {
        let options = ImageAnalysisOptions {
            language: Some("en".into()),
            smart_crops_aspect_ratios: vec![0.9, 1.33],
            ..Default::default()
        };
        let path = analyze_path(
            &[VisualFeature::Read, VisualFeature::Caption, VisualFeature::SmartCrops],
            &options,
        )
        .unwrap();
        assert_eq!(
            path,
            "/computervision/imageanalysis:analyze?api-version=2024-02-01&features=caption,read,smartCrops&gender-neutral-caption=true&language=en&smartcrops-aspect-ratios=0.9,1.33"
        );
    }

    #[test]
    fn rejects_query_breaking_options() {
        let options = ImageAnalysisOptions {
            model_version: Some("latest&features=tags".into()),
            ..Default::default()
        };
        let err = analyze_path(&[VisualFeature::Caption], &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid request: invalid model version 'latest&features=tags'"
        );
    }

    #[test]
    fn parses_feature_names() {
        assert_eq!(VisualFeature::parse("dense-captions"), Some(VisualFeature::DenseCaptions));
        assert_eq!(VisualFeature::parse("TAGS"), Some(VisualFeature::Tags));
        assert_eq!(VisualFeature::parse("faces"), None);
    }

    #[test]
    fn bounding_box_display() {
        let b = BoundingBox { x: 1, y: 2, w: 3, h: 4 };
        assert_eq!(b.to_string(), "{X=1,Y=2,Width=3,Height=4}");
    }

    #[tokio::test]
    async fn analyzes_caption_and_read() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/computervision/imageanalysis:analyze"))
            .and(query_param("features", "caption,read"))
            .and(query_param("gender-neutral-caption", "true"))
            .and(header("Content-Type", "application/octet-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "modelVersion": "2023-10-01",
                "metadata": {"width": 1024, "height": 768},
                "captionResult": {"text": "a man pointing at a screen", "confidence": 0.7767},
                "readResult": {"blocks": [{"lines": [{
                    "text": "Hello",
                    "boundingPolygon": [{"x": 1, "y": 2}, {"x": 3, "y": 2}, {"x": 3, "y": 4}, {"x": 1, "y": 4}],
                    "words": [{"text": "Hello", "boundingPolygon": [], "confidence": 0.998}]
                }]}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ImageAnalysisClient::new(&server.uri(), "k").unwrap();
        let result = client
            .analyze(RequestPayload::Image(Bytes::from_static(b"\x89PNG")))
            .await
            .unwrap();
        assert_eq!(result.metadata.width, 1024);
        assert_eq!(result.caption_result.unwrap().text, "a man pointing at a screen");
        let read = result.read_result.unwrap();
        assert_eq!(read.lines().count(), 1);
        assert!(result.tags_result.is_none());
    }
}
