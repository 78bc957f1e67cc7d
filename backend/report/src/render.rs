//! Outcome → text dispatch with a raw JSON fallback.

use std::fmt::{self, Write};
use std::io;

use tracing::warn;

use crate::outcome::AnalysisOutcome;
use crate::{document, safety, speech, translation, vision};

/// Render an outcome under an optional context label. Never fails: a
/// formatting error yields `Raw response:` followed by the outcome as JSON.
pub fn render(outcome: &AnalysisOutcome, label: &str) -> String {
    render_with(outcome, label, write_outcome)
}

pub(crate) fn render_with<F>(outcome: &AnalysisOutcome, label: &str, body: F) -> String
where
    F: FnOnce(&mut String, &AnalysisOutcome) -> fmt::Result,
{
    let mut out = String::new();
    let written = write_label(&mut out, label).and_then(|()| body(&mut out, outcome));
    match written {
        Ok(()) => out,
        Err(_) => {
            warn!(label, "Formatting failed; dumping raw response");
            raw_dump(outcome)
        }
    }
}

fn write_label(out: &mut String, label: &str) -> fmt::Result {
    if label.is_empty() {
        return Ok(());
    }
    writeln!(out, "{label}")
}

fn raw_dump(outcome: &AnalysisOutcome) -> String {
    let json = serde_json::to_string_pretty(outcome)
        .unwrap_or_else(|e| format!("<response could not be serialized: {e}>"));
    format!("Raw response:\n{json}\n")
}

/// Write the rendered report to a stream and flush it.
pub fn write_report(
    out: &mut impl io::Write,
    outcome: &AnalysisOutcome,
    label: &str,
) -> io::Result<()> {
    out.write_all(render(outcome, label).as_bytes())?;
    out.flush()
}

fn write_outcome(out: &mut String, outcome: &AnalysisOutcome) -> fmt::Result {
    use AnalysisOutcome as O;
    match outcome {
        O::TextModeration(r) => safety::text(out, r),
        O::ImageModeration(r) => safety::image(out, &r.categories_analysis),
        O::PromptShield(r) => safety::shield(out, r),
        O::ProtectedMaterial(r) => safety::protected(out, r),
        O::BlocklistSaved { blocklist, created } => safety::blocklist_saved(out, blocklist, *created),
        O::Blocklists(lists) => safety::blocklists(out, lists),
        O::BlocklistItems {
            blocklist_name,
            items,
        } => safety::blocklist_items(out, blocklist_name, items),
        O::ImageAnalysis(r) => vision::image_analysis(out, r),
        O::Faces(faces) => vision::faces(out, faces),
        O::Predictions {
            detection,
            prediction,
        } => vision::predictions(out, prediction, *detection),
        O::Invoices(invoices) => document::invoices(out, invoices),
        O::IdDocuments(docs) => document::id_documents(out, docs),
        O::SpeechSynthesized {
            path,
            bytes,
            content_type,
        } => speech::synthesized(out, path, *bytes, content_type),
        O::Voices(voices) => speech::voices(out, voices),
        O::Recognition(r) => speech::recognition(out, r),
        O::Transcription(t) => speech::transcription(out, t),
        O::LanguageIdentification(l) => speech::language(out, l),
        O::SpeechTranslation(t) => speech::speech_translation(out, t),
        O::VoiceProfile(p) => speech::profile(out, p),
        O::Enrollment(e) => speech::enrollment(out, e),
        O::Verification(v) => speech::verification(out, v),
        O::ProfileDeleted { profile_id } => writeln!(out, "Profile {profile_id} deleted."),
        O::Translations(r) => translation::translations(out, r),
        O::LanguageDetections(d) => translation::detections(out, d),
        O::DocumentTranslated {
            original,
            translated,
        } => translation::document(out, original, translated),
        O::BatchStarted { status_url } => translation::batch_started(out, status_url),
        O::BatchStatus(s) => translation::batch_status(out, s),
    }
}
