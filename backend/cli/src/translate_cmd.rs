//! `cogforge translate ...`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use cogforge_config::{CogForgeConfig, ServiceSection};
use cogforge_core::{detect_mime_type, Analyzer, RequestPayload};
use cogforge_report::AnalysisOutcome;
use cogforge_translation::{
    BatchRequest, DocumentTranslationClient, Translator, DEFAULT_FROM, DEFAULT_TARGET_LANGUAGE,
    DEFAULT_TO, SAMPLE_DOCUMENT_PATH, SAMPLE_TEXT,
};
use tracing::info;

use crate::Report;

#[derive(Subcommand)]
pub enum TranslateCommand {
    /// Translate text into one or more languages
    Text {
        text: Option<String>,
        /// Source language; detected by the service when set to `auto`
        #[arg(long, default_value = DEFAULT_FROM)]
        from: String,
        /// Comma-separated target languages
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
    },
    /// Detect the language of a text
    Detect {
        text: Option<String>,
    },
    /// Translate a local document synchronously
    Document {
        path: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_TARGET_LANGUAGE)]
        to: String,
        /// Where to write the translated document
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Start a batch translation between two blob containers
    Batch {
        /// SAS URL of the source container
        #[arg(long)]
        source_url: String,
        /// SAS URL of the target container
        #[arg(long)]
        target_url: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value = DEFAULT_TARGET_LANGUAGE)]
        to: String,
    },
    /// Show the status of a batch translation
    BatchStatus {
        /// Status URL returned when the batch was started
        url: String,
    },
}

fn translator(config: &CogForgeConfig) -> Result<Translator> {
    let credentials = config.credentials(ServiceSection::Translator)?;
    Ok(Translator::from_credentials(&credentials)?.with_timeout(config.http_timeout()))
}

fn document_client(config: &CogForgeConfig) -> Result<DocumentTranslationClient> {
    let credentials = config.credentials(ServiceSection::DocumentTranslation)?;
    Ok(DocumentTranslationClient::from_credentials(&credentials)?.with_timeout(config.http_timeout()))
}

fn source_language(from: &str) -> Option<&str> {
    Some(from).filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case("auto"))
}

pub async fn run(cmd: TranslateCommand, config: &CogForgeConfig) -> Result<Vec<Report>> {
    match cmd {
        TranslateCommand::Text { text, from, to } => {
            let text = text.unwrap_or_else(|| SAMPLE_TEXT.to_string());
            let to: Vec<String> = if to.is_empty() {
                DEFAULT_TO.iter().map(|t| t.to_string()).collect()
            } else {
                to
            };
            let results = translator(config)?
                .with_languages(source_language(&from).map(str::to_string), to)
                .analyze(RequestPayload::text(text.as_str()))
                .await?;
            Ok(vec![Report::new(
                format!("Original: {text}"),
                AnalysisOutcome::Translations(results),
            )])
        }
        TranslateCommand::Detect { text } => {
            let text = text.unwrap_or_else(|| SAMPLE_TEXT.to_string());
            let detections = translator(config)?.detect(&[text.clone()]).await?;
            Ok(vec![Report::new(
                format!("Text: {text}"),
                AnalysisOutcome::LanguageDetections(detections),
            )])
        }
        TranslateCommand::Document { path, to, output } => {
            let path = path.unwrap_or_else(|| PathBuf::from(SAMPLE_DOCUMENT_PATH));
            let document = cogforge_core::load_local_file(&path).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            let translated = document_client(config)?
                .translate_document(document.clone(), &file_name, detect_mime_type(&path), &to)
                .await?;
            if let Some(output) = &output {
                tokio::fs::write(output, &translated)
                    .await
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                info!(path = %output.display(), bytes = translated.len(), "Translated document written");
            }
            Ok(vec![Report::unlabeled(AnalysisOutcome::DocumentTranslated {
                original: String::from_utf8_lossy(&document).into_owned(),
                translated: String::from_utf8_lossy(&translated).into_owned(),
            })])
        }
        TranslateCommand::Batch {
            source_url,
            target_url,
            from,
            to,
        } => {
            let request = BatchRequest::single(source_url, from, target_url, to);
            let status_url = document_client(config)?.start_batch(&request).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::BatchStarted { status_url })])
        }
        TranslateCommand::BatchStatus { url } => {
            let status = document_client(config)?.batch_status(&url).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::BatchStatus(status))])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogforge_config::schema::ServiceConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn auto_source_sends_no_from() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(query_param_is_missing("from"))
            .and(query_param("to", "de"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "detectedLanguage": {"language": "en", "score": 1.0},
                "translations": [{"text": "Hallo", "to": "de"}]
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let config = CogForgeConfig {
            translator: Some(ServiceConfig {
                endpoint: Some(server.uri()),
                api_key: Some("k".to_string()),
                region: None,
            }),
            ..CogForgeConfig::default()
        };
        let cmd = TranslateCommand::Text {
            text: Some("Hello".to_string()),
            from: "auto".to_string(),
            to: vec!["de".to_string()],
        };
        let reports = run(cmd, &config).await.unwrap();
        assert_eq!(reports[0].label, "Original: Hello");
        assert!(matches!(
            &reports[0].outcome,
            AnalysisOutcome::Translations(results) if results[0].translations[0].text == "Hallo"
        ));
    }

    #[test]
    fn auto_source_lets_the_service_detect() {
        assert_eq!(source_language("en"), Some("en"));
        assert_eq!(source_language("auto"), None);
        assert_eq!(source_language(""), None);
    }
}
