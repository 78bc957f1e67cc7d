//! Wire types of the content moderation API.

use cogforge_core::{HarmCategory, Severity};
use serde::{Deserialize, Serialize};

/// Granularity of the returned severities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputType {
    /// 0, 2, 4, 6
    #[default]
    FourSeverityLevels,
    /// 0..=7
    EightSeverityLevels,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextOptions {
    pub text: String,
    /// Empty means every category.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<HarmCategory>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocklist_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halt_on_blocklist_hit: Option<bool>,
    pub output_type: OutputType,
}

impl AnalyzeTextOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_blocklists<I, S>(mut self, names: I, halt_on_hit: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocklist_names = names.into_iter().map(Into::into).collect();
        self.halt_on_blocklist_hit = Some(halt_on_hit);
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }
}

/// Image to moderate: inline bytes (sent base64) or a blob URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageOptions {
    pub image: ImageData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<HarmCategory>,
    pub output_type: OutputType,
}

impl AnalyzeImageOptions {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        use base64::{engine::general_purpose::STANDARD, Engine};
        Self {
            image: ImageData {
                content: Some(STANDARD.encode(bytes)),
                blob_url: None,
            },
            categories: Vec::new(),
            output_type: OutputType::FourSeverityLevels,
        }
    }

    pub fn from_blob_url(url: impl Into<String>) -> Self {
        Self {
            image: ImageData {
                content: None,
                blob_url: Some(url.into()),
            },
            categories: Vec::new(),
            output_type: OutputType::FourSeverityLevels,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub category: HarmCategory,
    #[serde(default)]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocklistMatch {
    pub blocklist_name: String,
    pub blocklist_item_id: String,
    pub blocklist_item_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextResult {
    #[serde(default)]
    pub blocklists_match: Vec<BlocklistMatch>,
    #[serde(default)]
    pub categories_analysis: Vec<CategoryAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageResult {
    #[serde(default)]
    pub categories_analysis: Vec<CategoryAnalysis>,
}

/// Severity lookup over a category list; an absent category reads as safe.
pub fn severity_in(analysis: &[CategoryAnalysis], category: HarmCategory) -> Severity {
    analysis
        .iter()
        .find(|a| a.category == category)
        .and_then(|a| a.severity)
        .unwrap_or(Severity::SAFE)
}

impl AnalyzeTextResult {
    pub fn severity_of(&self, category: HarmCategory) -> Severity {
        severity_in(&self.categories_analysis, category)
    }

    pub fn has_blocklist_hits(&self) -> bool {
        !self.blocklists_match.is_empty()
    }
}

impl AnalyzeImageResult {
    pub fn severity_of(&self, category: HarmCategory) -> Severity {
        severity_in(&self.categories_analysis, category)
    }
}

// ---------------------------------------------------------------------------
// Blocklists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlocklist {
    pub blocklist_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlocklistItem {
    /// Assigned by the service; absent on items being added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocklist_item_id: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TextBlocklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            blocklist_item_id: None,
            text: text.into(),
            description: None,
        }
    }
}

/// Outcome of a create-or-update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocklistUpsert {
    pub blocklist: TextBlocklist,
    /// `true` when the service answered 201 Created.
    pub created: bool,
}

// ---------------------------------------------------------------------------
// Prompt shields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackAnalysis {
    pub attack_detected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldPromptResult {
    #[serde(default)]
    pub user_prompt_analysis: Option<AttackAnalysis>,
    #[serde(default)]
    pub documents_analysis: Vec<AttackAnalysis>,
}

impl ShieldPromptResult {
    pub fn any_attack(&self) -> bool {
        self.user_prompt_analysis
            .map(|a| a.attack_detected)
            .unwrap_or(false)
            || self.documents_analysis.iter().any(|d| d.attack_detected)
    }
}

// ---------------------------------------------------------------------------
// Protected material
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCitation {
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub source_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedMaterialAnalysis {
    pub detected: bool,
    /// Only returned by the code variant.
    #[serde(default)]
    pub code_citations: Vec<CodeCitation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedMaterialResult {
    pub protected_material_analysis: ProtectedMaterialAnalysis,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_category_is_safe() {
        let result: AnalyzeTextResult = serde_json::from_value(json!({
            "categoriesAnalysis": [
                {"category": "Hate", "severity": 2},
                {"category": "Violence"}
            ]
        }))
        .unwrap();
        assert_eq!(result.severity_of(HarmCategory::Hate), Severity(2));
        assert_eq!(result.severity_of(HarmCategory::Violence), Severity::SAFE);
        assert_eq!(result.severity_of(HarmCategory::Sexual), Severity::SAFE);
        assert!(!result.has_blocklist_hits());
    }

    #[test]
    fn text_options_serialize_camel_case() {
        let opts = AnalyzeTextOptions::new("hello").with_blocklists(["ProhibitStockAnalysis"], true);
        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "hello",
                "blocklistNames": ["ProhibitStockAnalysis"],
                "haltOnBlocklistHit": true,
                "outputType": "FourSeverityLevels"
            })
        );
    }

    #[test]
    fn image_options_encode_base64() {
        let value = serde_json::to_value(AnalyzeImageOptions::from_bytes(b"abc")).unwrap();
        assert_eq!(value["image"]["content"], "YWJj");
        assert!(value["image"].get("blobUrl").is_none());
    }

    #[test]
    fn shield_detects_document_attack() {
        let result: ShieldPromptResult = serde_json::from_value(json!({
            "userPromptAnalysis": {"attackDetected": false},
            "documentsAnalysis": [{"attackDetected": true}]
        }))
        .unwrap();
        assert!(result.any_attack());
    }

    #[test]
    fn code_citations_decode() {
        let result: ProtectedMaterialResult = serde_json::from_value(json!({
            "protectedMaterialAnalysis": {
                "detected": true,
                "codeCitations": [{"license": "NOASSERTION", "sourceUrls": ["https://github.com/x/y"]}]
            }
        }))
        .unwrap();
        let analysis = result.protected_material_analysis;
        assert!(analysis.detected);
        assert_eq!(analysis.code_citations[0].source_urls.len(), 1);
    }
}
