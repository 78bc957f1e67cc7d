//! `cogforge vision ...`

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;
use cogforge_config::{CogForgeConfig, ServiceSection};
use cogforge_report::AnalysisOutcome;
use cogforge_vision::{
    CustomVisionClient, FaceClient, ImageAnalysisClient, ImageAnalysisOptions, VisualFeature,
    SAMPLE_ANALYSIS_IMAGE, SAMPLE_FACE_IMAGE, SAMPLE_PREDICTION_IMAGE,
};

use crate::{read_input, Report};

#[derive(Subcommand)]
pub enum VisionCommand {
    /// Caption, tag, read and locate objects in an image
    Analyze {
        path: Option<PathBuf>,
        /// Comma-separated features; all of them when omitted
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
        /// Caption language
        #[arg(long)]
        language: Option<String>,
    },
    /// Detect faces with landmarks and attributes
    Faces {
        path: Option<PathBuf>,
    },
    /// Classify an image with the published custom model
    Classify {
        path: Option<PathBuf>,
    },
    /// Detect objects with the published custom model
    Detect {
        path: Option<PathBuf>,
    },
}

fn parse_features(names: &[String]) -> Result<Vec<VisualFeature>> {
    if names.is_empty() {
        return Ok(VisualFeature::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| match VisualFeature::parse(name) {
            Some(feature) => Ok(feature),
            None => bail!("unknown visual feature '{name}'"),
        })
        .collect()
}

pub async fn run(cmd: VisionCommand, config: &CogForgeConfig) -> Result<Vec<Report>> {
    match cmd {
        VisionCommand::Analyze {
            path,
            features,
            language,
        } => {
            let features = parse_features(&features)?;
            let credentials = config.credentials(ServiceSection::Vision)?;
            let client =
                ImageAnalysisClient::from_credentials(&credentials)?.with_timeout(config.http_timeout());
            let image = read_input(path.as_deref(), SAMPLE_ANALYSIS_IMAGE).await?;
            let options = ImageAnalysisOptions {
                language,
                ..Default::default()
            };
            let result = client.analyze_image(image, &features, &options).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::ImageAnalysis(result))])
        }
        VisionCommand::Faces { path } => {
            let credentials = config.credentials(ServiceSection::Face)?;
            let client = FaceClient::from_credentials(&credentials)?.with_timeout(config.http_timeout());
            let image = read_input(path.as_deref(), SAMPLE_FACE_IMAGE).await?;
            let faces = client.detect(image).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::Faces(faces))])
        }
        VisionCommand::Classify { path } => predict(config, path, false).await,
        VisionCommand::Detect { path } => predict(config, path, true).await,
    }
}

async fn predict(
    config: &CogForgeConfig,
    path: Option<PathBuf>,
    detection: bool,
) -> Result<Vec<Report>> {
    let target = config.custom_vision_target()?;
    let client =
        CustomVisionClient::from_credentials(&target.credentials)?.with_timeout(config.http_timeout());
    let image = read_input(path.as_deref(), SAMPLE_PREDICTION_IMAGE).await?;
    let prediction = if detection {
        client
            .detect_image(&target.project_id, &target.published_name, image)
            .await?
    } else {
        client
            .classify_image(&target.project_id, &target.published_name, image)
            .await?
    };
    Ok(vec![Report::unlabeled(AnalysisOutcome::Predictions {
        detection,
        prediction,
    })])
}
