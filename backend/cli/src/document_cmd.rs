//! `cogforge document ...`: prebuilt invoice and ID document models.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use cogforge_config::{CogForgeConfig, ServiceSection};
use cogforge_document::{
    DocumentIntelligenceClient, IdDocumentSummary, InvoiceSummary, ID_DOCUMENT_MODEL,
    INVOICE_MODEL, SAMPLE_ID_DOCUMENT_PATH, SAMPLE_INVOICE_URL,
};
use cogforge_report::AnalysisOutcome;

use crate::{read_input, Report};

#[derive(Subcommand)]
pub enum DocumentCommand {
    /// Extract vendor, customer, items and totals from an invoice
    Invoice {
        /// Public URL of the invoice
        #[arg(long, conflicts_with = "path")]
        url: Option<String>,
        /// Local invoice file
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Extract identity fields from a driver license or passport
    Id {
        path: Option<PathBuf>,
    },
}

fn client(config: &CogForgeConfig) -> Result<DocumentIntelligenceClient> {
    let credentials = config.credentials(ServiceSection::DocumentIntelligence)?;
    Ok(DocumentIntelligenceClient::from_credentials(&credentials)?
        .with_timeout(config.http_timeout())
        .with_poll_options(config.poll_options()))
}

pub async fn run(cmd: DocumentCommand, config: &CogForgeConfig) -> Result<Vec<Report>> {
    match cmd {
        DocumentCommand::Invoice { url, path } => {
            let client = client(config)?;
            let result = match path {
                Some(path) => {
                    let document = cogforge_core::load_local_file(&path).await?;
                    client.analyze_bytes(INVOICE_MODEL, document).await?
                }
                None => {
                    let url = url.unwrap_or_else(|| SAMPLE_INVOICE_URL.to_string());
                    client.analyze_url(INVOICE_MODEL, &url).await?
                }
            };
            let invoices = result
                .documents
                .iter()
                .map(InvoiceSummary::from_document)
                .collect();
            Ok(vec![Report::unlabeled(AnalysisOutcome::Invoices(invoices))])
        }
        DocumentCommand::Id { path } => {
            let client = client(config)?;
            let document = read_input(path.as_deref(), SAMPLE_ID_DOCUMENT_PATH).await?;
            let result = client.analyze_bytes(ID_DOCUMENT_MODEL, document).await?;
            let summaries = result
                .documents
                .iter()
                .map(IdDocumentSummary::from_document)
                .collect();
            Ok(vec![Report::unlabeled(AnalysisOutcome::IdDocuments(summaries))])
        }
    }
}
