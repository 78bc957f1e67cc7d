//! Identity document summary over a `prebuilt-idDocument` document.

use serde::Serialize;

use crate::models::AnalyzedDocument;

/// Sample ID document read when no path is given.
pub const SAMPLE_ID_DOCUMENT_PATH: &str = "Images/id-document.jpg";

/// Values are the printed `content` of each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdDocumentSummary {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub document_number: Option<String>,
    pub date_of_expiration: Option<String>,
    pub sex: Option<String>,
    pub date_of_issue: Option<String>,
}

impl IdDocumentSummary {
    pub fn from_document(document: &AnalyzedDocument) -> Self {
        let content = |name: &str| {
            document
                .fields
                .get(name)
                .and_then(|f| f.content.clone())
        };
        Self {
            first_name: content("FirstName"),
            last_name: content("LastName"),
            date_of_birth: content("DateOfBirth"),
            document_number: content("DocumentNumber"),
            date_of_expiration: content("DateOfExpiration"),
            sex: content("Sex"),
            date_of_issue: content("DateOfIssue"),
        }
    }
}
