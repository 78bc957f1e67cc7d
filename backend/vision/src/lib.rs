//! `cogforge-vision`: image understanding clients.
//!
//! Image Analysis 4.0, face detection and Custom Vision prediction.

pub mod custom_vision;
pub mod face;
pub mod image_analysis;

pub use custom_vision::{CustomVisionClient, ImagePrediction, NormalizedBox, Prediction, PredictionKind};
pub use face::{DetectedFace, FaceAttributes, FaceClient, FaceRectangle, HeadPose, LandmarkPoint, Mask, LANDMARK_ORDER};
pub use image_analysis::{
    BoundingBox, ImageAnalysisClient, ImageAnalysisOptions, ImageAnalysisResult, VisualFeature,
};

/// Default sample images.
pub const SAMPLE_ANALYSIS_IMAGE: &str = "Images/testing-image.png";
pub const SAMPLE_FACE_IMAGE: &str = "Images/people.jpg";
pub const SAMPLE_PREDICTION_IMAGE: &str = "Images/test/test_image.jpg";
