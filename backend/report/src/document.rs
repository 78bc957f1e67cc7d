use std::fmt::{self, Write};

use cogforge_document::{AmountValue, IdDocumentSummary, InvoiceSummary, TextValue};

fn confidence(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |c| c.to_string())
}

fn text_field(out: &mut impl Write, indent: &str, name: &str, field: &Option<TextValue>) -> fmt::Result {
    match field {
        Some(f) => writeln!(
            out,
            "{indent}{name}: '{}', Confidence: {}",
            f.value,
            confidence(f.confidence)
        ),
        None => Ok(()),
    }
}

fn amount_field(out: &mut impl Write, indent: &str, name: &str, field: &Option<AmountValue>) -> fmt::Result {
    match field {
        Some(f) => writeln!(
            out,
            "{indent}{name}: '{}', Confidence: {}",
            f.value.display(),
            confidence(f.confidence)
        ),
        None => Ok(()),
    }
}

pub(crate) fn invoices(out: &mut impl Write, invoices: &[InvoiceSummary]) -> fmt::Result {
    if invoices.is_empty() {
        return writeln!(out, "No invoices found in the document.");
    }
    for (i, invoice) in invoices.iter().enumerate() {
        writeln!(out, "Document {i}:")?;
        text_field(out, "", "Vendor Name", &invoice.vendor_name)?;
        text_field(out, "", "Customer Name", &invoice.customer_name)?;
        if !invoice.items.is_empty() {
            writeln!(out, "Invoice items:")?;
        }
        for (n, item) in invoice.items.iter().enumerate() {
            writeln!(out, "  Item #{}", n + 1)?;
            text_field(out, "    ", "Description", &item.description)?;
            amount_field(out, "    ", "Amount", &item.amount)?;
        }
        amount_field(out, "", "Sub Total", &invoice.sub_total)?;
        amount_field(out, "", "Total Tax", &invoice.total_tax)?;
        amount_field(out, "", "Invoice Total", &invoice.invoice_total)?;
    }
    Ok(())
}

pub(crate) fn id_documents(out: &mut impl Write, documents: &[IdDocumentSummary]) -> fmt::Result {
    if documents.is_empty() {
        return writeln!(out, "No identity document found.");
    }
    for doc in documents {
        writeln!(out, "=== ID Document Details ===")?;
        let rows = [
            ("First Name", &doc.first_name),
            ("Last Name", &doc.last_name),
            ("DOB", &doc.date_of_birth),
            ("ID Number", &doc.document_number),
            ("Expiry Date", &doc.date_of_expiration),
            ("Gender", &doc.sex),
            ("Issue Date", &doc.date_of_issue),
        ];
        for (label, value) in rows {
            writeln!(out, "{label}: {}", value.as_deref().unwrap_or("(not found)"))?;
        }
    }
    Ok(())
}
