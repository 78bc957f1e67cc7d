//! Face detection with landmarks, head pose, mask and recognition quality.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cogforge_core::{
    Analyzer, CogError, CogResult, PayloadKind, RequestPayload, ServiceClient, ServiceCredentials,
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SERVICE_NAME: &str = "Face";

pub const DETECTION_MODEL: &str = "detection_03";
pub const RECOGNITION_MODEL: &str = "recognition_04";
pub const FACE_ATTRIBUTES: &str = "headPose,mask,qualityForRecognition";

/// The 27 predefined landmarks as `(wire name, display name)`, in report order.
pub const LANDMARK_ORDER: [(&str, &str); 27] = [
    ("pupilLeft", "PupilLeft"),
    ("pupilRight", "PupilRight"),
    ("noseTip", "NoseTip"),
    ("mouthLeft", "MouthLeft"),
    ("mouthRight", "MouthRight"),
    ("eyebrowLeftOuter", "EyebrowLeftOuter"),
    ("eyebrowLeftInner", "EyebrowLeftInner"),
    ("eyeLeftOuter", "EyeLeftOuter"),
    ("eyeLeftTop", "EyeLeftTop"),
    ("eyeLeftBottom", "EyeLeftBottom"),
    ("eyeLeftInner", "EyeLeftInner"),
    ("eyebrowRightInner", "EyebrowRightInner"),
    ("eyebrowRightOuter", "EyebrowRightOuter"),
    ("eyeRightInner", "EyeRightInner"),
    ("eyeRightTop", "EyeRightTop"),
    ("eyeRightBottom", "EyeRightBottom"),
    ("eyeRightOuter", "EyeRightOuter"),
    ("noseRootLeft", "NoseRootLeft"),
    ("noseRootRight", "NoseRootRight"),
    ("noseLeftAlarTop", "NoseLeftAlarTop"),
    ("noseRightAlarTop", "NoseRightAlarTop"),
    ("noseLeftAlarOutTip", "NoseLeftAlarOutTip"),
    ("noseRightAlarOutTip", "NoseRightAlarOutTip"),
    ("upperLipTop", "UpperLipTop"),
    ("upperLipBottom", "UpperLipBottom"),
    ("underLipTop", "UnderLipTop"),
    ("underLipBottom", "UnderLipBottom"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRectangle {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mask {
    #[serde(rename = "type")]
    pub mask_type: String,
    pub nose_and_mouth_covered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceAttributes {
    #[serde(default)]
    pub head_pose: Option<HeadPose>,
    #[serde(default)]
    pub mask: Option<Mask>,
    /// `low`, `medium` or `high`.
    #[serde(default)]
    pub quality_for_recognition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    #[serde(default)]
    pub face_id: Option<String>,
    pub face_rectangle: FaceRectangle,
    #[serde(default)]
    pub face_landmarks: HashMap<String, LandmarkPoint>,
    #[serde(default)]
    pub face_attributes: Option<FaceAttributes>,
    #[serde(default)]
    pub recognition_model: Option<String>,
}

impl DetectedFace {
    /// Landmarks in anatomical report order; missing points are `None`.
    pub fn ordered_landmarks(&self) -> impl Iterator<Item = (&'static str, Option<LandmarkPoint>)> + '_ {
        LANDMARK_ORDER
            .iter()
            .map(move |(wire, display)| (*display, self.face_landmarks.get(*wire).copied()))
    }
}

#[derive(Debug, Clone)]
pub struct FaceClient {
    http: ServiceClient,
}

/// `/face/v1.0/detect` with the fixed model and attribute selection.
pub fn detect_path() -> String {
    format!(
        "/face/v1.0/detect?detectionModel={DETECTION_MODEL}&recognitionModel={RECOGNITION_MODEL}\
         &returnFaceId=false&returnFaceLandmarks=true&returnRecognitionModel=true\
         &returnFaceAttributes={FACE_ATTRIBUTES}&faceIdTimeToLive=120"
    )
}

impl FaceClient {
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

    pub async fn detect(&self, image: Bytes) -> CogResult<Vec<DetectedFace>> {
        if image.is_empty() {
            return Err(CogError::invalid_request("image payload is empty"));
        }
        let faces: Vec<DetectedFace> = self
            .http
            .post_bytes("detect faces", &detect_path(), image, "application/octet-stream")
            .await?;
        info!(faces = faces.len(), "Faces detected");
        Ok(faces)
    }
}

#[async_trait]
impl Analyzer for FaceClient {
    type Output = Vec<DetectedFace>;

    fn service(&self) -> &str {
        SERVICE_NAME
    }

    fn accepts(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::Image
    }

    async fn analyze(&self, payload: RequestPayload) -> CogResult<Vec<DetectedFace>> {
        self.check(&payload)?;
        match payload {
            RequestPayload::Image(image) => self.detect(image).await,
            _ => Err(CogError::invalid_request("expected an image payload")),
        }
    }
}
