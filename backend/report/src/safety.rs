use std::fmt::{self, Write};

use cogforge_core::{HarmCategory, MAX_SEVERITY};
use cogforge_safety::models::severity_in;
use cogforge_safety::{
    AnalyzeTextResult, BlocklistMatch, CategoryAnalysis, ProtectedMaterialResult,
    ShieldPromptResult, TextBlocklist, TextBlocklistItem,
};

use crate::table::{render_table, Column};

const RULE_WIDTH: usize = 40;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Severity table over every category in fixed order.
pub(crate) fn severity_table(
    out: &mut impl Write,
    heading: &str,
    analysis: &[CategoryAnalysis],
) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{heading}")?;
    writeln!(out, "{rule}")?;
    for category in HarmCategory::ALL {
        let severity = severity_in(analysis, category);
        writeln!(
            out,
            "{:<15}: {} ({})",
            category.display_name(),
            severity,
            severity.description()
        )?;
    }
    writeln!(out, "{rule}")?;
    writeln!(out, "Severity Scale: 0 (Safe) - {MAX_SEVERITY} (High Risk)")
}

fn blocklist_matches(out: &mut impl Write, matches: &[BlocklistMatch]) -> fmt::Result {
    if matches.is_empty() {
        return writeln!(out, "No blocklist matches found.");
    }
    writeln!(out, "BLOCKLIST MATCHES FOUND:")?;
    for m in matches {
        writeln!(out, "- Blocklist: {}", m.blocklist_name)?;
        writeln!(out, "  Item ID: {}", m.blocklist_item_id)?;
        writeln!(out, "  Matched Text: {}", m.blocklist_item_text)?;
    }
    Ok(())
}

pub(crate) fn text(out: &mut impl Write, result: &AnalyzeTextResult) -> fmt::Result {
    severity_table(out, "Content Safety Analysis Results:", &result.categories_analysis)?;
    writeln!(out)?;
    blocklist_matches(out, &result.blocklists_match)
}

pub(crate) fn image(out: &mut impl Write, analysis: &[CategoryAnalysis]) -> fmt::Result {
    severity_table(out, "Image Content Safety Analysis Results:", analysis)
}

pub(crate) fn shield(out: &mut impl Write, result: &ShieldPromptResult) -> fmt::Result {
    writeln!(out, "Prompt Shield Analysis Results:")?;
    match result.user_prompt_analysis {
        Some(analysis) => writeln!(
            out,
            "User prompt attack detected: {}",
            yes_no(analysis.attack_detected)
        )?,
        None => writeln!(out, "User prompt attack detected: not analyzed")?,
    }
    for (i, doc) in result.documents_analysis.iter().enumerate() {
        writeln!(
            out,
            "Document {} attack detected: {}",
            i + 1,
            yes_no(doc.attack_detected)
        )?;
    }
    writeln!(out, "Attack detected overall: {}", yes_no(result.any_attack()))
}

pub(crate) fn protected(out: &mut impl Write, result: &ProtectedMaterialResult) -> fmt::Result {
    let analysis = &result.protected_material_analysis;
    writeln!(out, "Protected Material Analysis Results:")?;
    writeln!(out, "Protected material detected: {}", yes_no(analysis.detected))?;
    if analysis.code_citations.is_empty() {
        return Ok(());
    }
    writeln!(out, "Code citations:")?;
    for citation in &analysis.code_citations {
        writeln!(
            out,
            "  License: {}",
            citation.license.as_deref().unwrap_or("unknown")
        )?;
        for url in &citation.source_urls {
            writeln!(out, "    Source: {url}")?;
        }
    }
    Ok(())
}

pub(crate) fn blocklist_saved(
    out: &mut impl Write,
    blocklist: &TextBlocklist,
    created: bool,
) -> fmt::Result {
    let verb = if created { "created" } else { "updated" };
    writeln!(out, "Blocklist {} {verb}.", blocklist.blocklist_name)?;
    if let Some(description) = &blocklist.description {
        writeln!(out, "Description: {description}")?;
    }
    Ok(())
}

pub(crate) fn blocklists(out: &mut impl Write, lists: &[TextBlocklist]) -> fmt::Result {
    if lists.is_empty() {
        return writeln!(out, "No blocklists found.");
    }
    let rows: Vec<Vec<String>> = lists
        .iter()
        .map(|l| {
            vec![
                l.blocklist_name.clone(),
                l.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    out.write_str(&render_table(
        &[Column::left("Name"), Column::left("Description").max_width(60)],
        &rows,
    ))
}

pub(crate) fn blocklist_items(
    out: &mut impl Write,
    name: &str,
    items: &[TextBlocklistItem],
) -> fmt::Result {
    writeln!(out, "Items in blocklist {name}:")?;
    if items.is_empty() {
        return writeln!(out, "No items found.");
    }
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            vec![
                i.blocklist_item_id.clone().unwrap_or_default(),
                i.text.clone(),
                i.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    out.write_str(&render_table(
        &[
            Column::left("Item ID"),
            Column::left("Text"),
            Column::left("Description").max_width(40),
        ],
        &rows,
    ))
}
