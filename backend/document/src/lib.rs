//! Field extraction with the prebuilt invoice and identity document models.

pub mod client;
pub mod id_document;
pub mod invoice;
pub mod models;

pub use client::{
    analyze_path, DocumentIntelligenceClient, API_VERSION, ID_DOCUMENT_MODEL, INVOICE_MODEL,
    SERVICE_NAME,
};
pub use id_document::{IdDocumentSummary, SAMPLE_ID_DOCUMENT_PATH};
pub use invoice::{AmountValue, InvoiceItem, InvoiceSummary, TextValue, SAMPLE_INVOICE_URL};
pub use models::{AnalyzeResult, AnalyzedDocument, CurrencyValue, DocumentField, FieldType};
