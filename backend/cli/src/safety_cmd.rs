//! `cogforge safety ...`: moderation, prompt shields, protected material, blocklists.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use cogforge_config::{CogForgeConfig, ServiceSection};
use cogforge_core::{Analyzer, RequestPayload};
use cogforge_report::AnalysisOutcome;
use cogforge_safety::samples::{
    BLOCKLIST_DESCRIPTION, BLOCKLIST_ITEMS, BLOCKLIST_NAME, BLOCKLIST_TEXT, PROTECTED_CODE,
    PROTECTED_LYRICS, SAMPLE_DOCUMENT, SAMPLE_IMAGE_PATH, SAMPLE_TEXT, SAMPLE_USER_PROMPT,
};
use cogforge_safety::{
    AnalyzeTextOptions, BlocklistClient, ContentSafetyClient, SafetyAnalysis, TextBlocklistItem,
};
use tracing::info;

use crate::{read_input, Report};

#[derive(Subcommand)]
pub enum SafetyCommand {
    /// Moderate a piece of text
    Text {
        /// Text to analyze
        text: Option<String>,
    },
    /// Moderate a local image
    Image {
        /// Image file
        path: Option<PathBuf>,
    },
    /// Detect jailbreak and indirect attacks in a prompt
    Shield {
        /// User prompt
        #[arg(long)]
        prompt: Option<String>,
        /// Grounding document; repeatable
        #[arg(long = "document")]
        documents: Vec<String>,
    },
    /// Detect protected text such as song lyrics
    ProtectedText {
        text: Option<String>,
    },
    /// Detect protected code with citations
    ProtectedCode {
        code: Option<String>,
    },
    /// Create or update a blocklist and add terms to it
    BlocklistCreate {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Terms to add
        items: Vec<String>,
    },
    /// List every blocklist of the resource
    BlocklistList,
    /// List the terms of a blocklist
    BlocklistItems {
        #[arg(long)]
        name: Option<String>,
    },
    /// Moderate text against a blocklist, halting on the first hit
    BlocklistAnalyze {
        #[arg(long)]
        name: Option<String>,
        text: Option<String>,
    },
}

fn moderation_client(config: &CogForgeConfig) -> Result<ContentSafetyClient> {
    let credentials = config.credentials(ServiceSection::ContentSafety)?;
    Ok(ContentSafetyClient::from_credentials(&credentials)?.with_timeout(config.http_timeout()))
}

fn blocklist_client(config: &CogForgeConfig) -> Result<BlocklistClient> {
    let credentials = config.credentials(ServiceSection::ContentSafety)?;
    Ok(BlocklistClient::from_credentials(&credentials)?.with_timeout(config.http_timeout()))
}

/// Moderate one text, image or prompt payload.
async fn moderate(config: &CogForgeConfig, payload: RequestPayload) -> Result<AnalysisOutcome> {
    Ok(match moderation_client(config)?.analyze(payload).await? {
        SafetyAnalysis::Text(result) => AnalysisOutcome::TextModeration(result),
        SafetyAnalysis::Image(result) => AnalysisOutcome::ImageModeration(result),
        SafetyAnalysis::Prompt(result) => AnalysisOutcome::PromptShield(result),
    })
}

pub async fn run(cmd: SafetyCommand, config: &CogForgeConfig) -> Result<Vec<Report>> {
    match cmd {
        SafetyCommand::Text { text } => {
            let text = text.unwrap_or_else(|| SAMPLE_TEXT.to_string());
            let outcome = moderate(config, RequestPayload::text(text.as_str())).await?;
            Ok(vec![Report::new(format!("Analyzing text: {text}"), outcome)])
        }
        SafetyCommand::Image { path } => {
            let image = read_input(path.as_deref(), SAMPLE_IMAGE_PATH).await?;
            let outcome = moderate(config, RequestPayload::Image(image)).await?;
            Ok(vec![Report::unlabeled(outcome)])
        }
        SafetyCommand::Shield { prompt, documents } => {
            let prompt = prompt.unwrap_or_else(|| SAMPLE_USER_PROMPT.to_string());
            let documents = if documents.is_empty() {
                vec![SAMPLE_DOCUMENT.to_string()]
            } else {
                documents
            };
            let outcome = moderate(config, RequestPayload::prompt(prompt, documents)).await?;
            Ok(vec![Report::unlabeled(outcome)])
        }
        SafetyCommand::ProtectedText { text } => {
            let text = text.unwrap_or_else(|| PROTECTED_LYRICS.to_string());
            let result = moderation_client(config)?.detect_protected_text(&text).await?;
            Ok(vec![Report::new(
                "Protected material (text)",
                AnalysisOutcome::ProtectedMaterial(result),
            )])
        }
        SafetyCommand::ProtectedCode { code } => {
            let code = code.unwrap_or_else(|| PROTECTED_CODE.to_string());
            let result = moderation_client(config)?.detect_protected_code(&code).await?;
            Ok(vec![Report::new(
                "Protected material (code)",
                AnalysisOutcome::ProtectedMaterial(result),
            )])
        }
        SafetyCommand::BlocklistCreate {
            name,
            description,
            items,
        } => {
            let name = name.unwrap_or_else(|| BLOCKLIST_NAME.to_string());
            let description = description.unwrap_or_else(|| BLOCKLIST_DESCRIPTION.to_string());
            let items: Vec<TextBlocklistItem> = if items.is_empty() {
                BLOCKLIST_ITEMS.iter().map(|t| TextBlocklistItem::new(*t)).collect()
            } else {
                items.into_iter().map(TextBlocklistItem::new).collect()
            };
            let client = blocklist_client(config)?;
            let upsert = client.create_or_update_blocklist(&name, &description).await?;
            let added = client.add_or_update_items(&name, &items).await?;
            info!(blocklist = %name, items = added.len(), "Blocklist ready");
            Ok(vec![
                Report::unlabeled(AnalysisOutcome::BlocklistSaved {
                    blocklist: upsert.blocklist,
                    created: upsert.created,
                }),
                Report::unlabeled(AnalysisOutcome::BlocklistItems {
                    blocklist_name: name,
                    items: added,
                }),
            ])
        }
        SafetyCommand::BlocklistList => {
            let blocklists = blocklist_client(config)?.list_blocklists().await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::Blocklists(blocklists))])
        }
        SafetyCommand::BlocklistItems { name } => {
            let name = name.unwrap_or_else(|| BLOCKLIST_NAME.to_string());
            let items = blocklist_client(config)?.list_items(&name).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::BlocklistItems {
                blocklist_name: name,
                items,
            })])
        }
        SafetyCommand::BlocklistAnalyze { name, text } => {
            let name = name.unwrap_or_else(|| BLOCKLIST_NAME.to_string());
            let text = text.unwrap_or_else(|| BLOCKLIST_TEXT.to_string());
            let options = AnalyzeTextOptions::new(text.as_str()).with_blocklists([name], true);
            let result = moderation_client(config)?.analyze_text(&options).await?;
            Ok(vec![Report::new(
                format!("Analyzing text: {text}"),
                AnalysisOutcome::TextModeration(result),
            )])
        }
    }
}
