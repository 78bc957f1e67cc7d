//! Analyze result documents and typed fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Field kinds the prebuilt models return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    String,
    Date,
    Time,
    PhoneNumber,
    Number,
    Integer,
    SelectionMark,
    CountryRegion,
    Signature,
    Array,
    Object,
    Currency,
    Address,
    Boolean,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyValue {
    pub amount: f64,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl CurrencyValue {
    /// Symbol followed by the amount, e.g. `$110`.
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_symbol.as_deref().unwrap_or(""), self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_currency: Option<CurrencyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_array: Option<Vec<DocumentField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_object: Option<HashMap<String, DocumentField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl DocumentField {
    pub fn as_string(&self) -> Option<&str> {
        match self.field_type {
            FieldType::String => self.value_string.as_deref().or(self.content.as_deref()),
            _ => None,
        }
    }

    pub fn as_currency(&self) -> Option<&CurrencyValue> {
        match self.field_type {
            FieldType::Currency => self.value_currency.as_ref(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocumentField]> {
        match self.field_type {
            FieldType::Array => self.value_array.as_deref(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, DocumentField>> {
        match self.field_type {
            FieldType::Object => self.value_object.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, DocumentField>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

/// Status document behind `Operation-Location`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    pub status: String,
    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_accessors_respect_field_type() {
        let field: DocumentField = serde_json::from_value(json!({
            "type": "currency",
            "valueCurrency": {"amount": 110.0, "currencySymbol": "$", "currencyCode": "USD"},
            "content": "$110.00",
            "confidence": 0.97
        }))
        .unwrap();
        assert_eq!(field.as_currency().unwrap().display(), "$110");
        assert!(field.as_string().is_none());
    }

    #[test]
    fn unknown_field_type_is_other() {
        let field: DocumentField =
            serde_json::from_value(json!({"type": "somethingNew", "content": "x"})).unwrap();
        assert_eq!(field.field_type, FieldType::Other);
    }
}
