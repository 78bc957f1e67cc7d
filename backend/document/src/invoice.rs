//! Invoice summary over a `prebuilt-invoice` document.

use serde::Serialize;

use crate::models::{AnalyzedDocument, CurrencyValue, DocumentField};

/// Sample invoice used when no document is given.
pub const SAMPLE_INVOICE_URL: &str = "https://raw.githubusercontent.com/Azure-Samples/cognitive-services-REST-api-samples/master/curl/form-recognizer/sample-invoice.pdf";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextValue {
    pub value: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountValue {
    pub value: CurrencyValue,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceItem {
    pub description: Option<TextValue>,
    pub amount: Option<AmountValue>,
}

/// Fields with an unexpected type are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub vendor_name: Option<TextValue>,
    pub customer_name: Option<TextValue>,
    pub items: Vec<InvoiceItem>,
    pub sub_total: Option<AmountValue>,
    pub total_tax: Option<AmountValue>,
    pub invoice_total: Option<AmountValue>,
}

fn text(field: Option<&DocumentField>) -> Option<TextValue> {
    let field = field?;
    Some(TextValue {
        value: field.as_string()?.to_string(),
        confidence: field.confidence,
    })
}

fn amount(field: Option<&DocumentField>) -> Option<AmountValue> {
    let field = field?;
    Some(AmountValue {
        value: field.as_currency()?.clone(),
        confidence: field.confidence,
    })
}

impl InvoiceSummary {
    pub fn from_document(document: &AnalyzedDocument) -> Self {
        let fields = &document.fields;
        let items = fields
            .get("Items")
            .and_then(DocumentField::as_array)
            .unwrap_or_default()
            .iter()
            .filter_map(DocumentField::as_object)
            .map(|item| InvoiceItem {
                description: text(item.get("Description")),
                amount: amount(item.get("Amount")),
            })
            .collect();

        Self {
            vendor_name: text(fields.get("VendorName")),
            customer_name: text(fields.get("CustomerName")),
            items,
            sub_total: amount(fields.get("SubTotal")),
            total_tax: amount(fields.get("TotalTax")),
            invoice_total: amount(fields.get("InvoiceTotal")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> AnalyzedDocument {
        serde_json::from_value(json!({
            "docType": "invoice",
            "fields": {
                "VendorName": {"type": "string", "valueString": "CONTOSO LTD.", "confidence": 0.93},
                "CustomerName": {"type": "number", "valueNumber": 3.0, "confidence": 0.5},
                "Items": {"type": "array", "valueArray": [
                    {"type": "object", "valueObject": {
                        "Description": {"type": "string", "valueString": "Consulting Services", "confidence": 0.9},
                        "Amount": {"type": "currency", "valueCurrency": {"amount": 60.0, "currencySymbol": "$"}, "confidence": 0.88}
                    }},
                    {"type": "string", "valueString": "stray"}
                ]},
                "InvoiceTotal": {"type": "currency", "valueCurrency": {"amount": 110.0, "currencySymbol": "$"}, "confidence": 0.97}
            }
        }))
        .unwrap()
    }

    #[test]
    fn extracts_expected_fields() {
        let summary = InvoiceSummary::from_document(&document());
        assert_eq!(summary.vendor_name.unwrap().value, "CONTOSO LTD.");
        assert_eq!(summary.items.len(), 1);
        let item = &summary.items[0];
        assert_eq!(item.description.as_ref().unwrap().value, "Consulting Services");
        assert_eq!(item.amount.as_ref().unwrap().value.display(), "$60");
        assert_eq!(summary.invoice_total.unwrap().value.amount, 110.0);
        assert!(summary.sub_total.is_none());
    }

    #[test]
    fn mistyped_field_is_skipped() {
        let summary = InvoiceSummary::from_document(&document());
        assert!(summary.customer_name.is_none());
    }
}
