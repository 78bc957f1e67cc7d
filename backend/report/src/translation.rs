use std::fmt::{self, Write};

use cogforge_translation::{BatchStatus, LanguageDetection, TranslationResult};

use crate::table::{render_table, Column};

pub(crate) fn translations(out: &mut impl Write, results: &[TranslationResult]) -> fmt::Result {
    for (i, result) in results.iter().enumerate() {
        if results.len() > 1 {
            writeln!(out, "Text {}:", i + 1)?;
        }
        if let Some(detected) = &result.detected_language {
            writeln!(
                out,
                "Detected language: {} (score {})",
                detected.language, detected.score
            )?;
        }
        for t in &result.translations {
            writeln!(out, "Translated ({}): {}", t.to, t.text)?;
        }
    }
    Ok(())
}

pub(crate) fn detections(out: &mut impl Write, detections: &[LanguageDetection]) -> fmt::Result {
    let flag = |b: bool| String::from(if b { "yes" } else { "no" });
    let rows: Vec<Vec<String>> = detections
        .iter()
        .map(|d| {
            vec![
                d.language.clone(),
                format!("{:.2}", d.score),
                flag(d.is_translation_supported),
                flag(d.is_transliteration_supported),
            ]
        })
        .collect();
    out.write_str(&render_table(
        &[
            Column::left("Language"),
            Column::right("Score"),
            Column::left("Translation"),
            Column::left("Transliteration"),
        ],
        &rows,
    ))
}

pub(crate) fn document(out: &mut impl Write, original: &str, translated: &str) -> fmt::Result {
    writeln!(out, "Request string for translation: {original}")?;
    writeln!(out, "Response string after translation: {translated}")
}

pub(crate) fn batch_started(out: &mut impl Write, status_url: &str) -> fmt::Result {
    writeln!(out, "Batch translation accepted.")?;
    writeln!(out, "Status URL: {status_url}")
}

pub(crate) fn batch_status(out: &mut impl Write, status: &BatchStatus) -> fmt::Result {
    writeln!(out, "Batch {}: {}", status.id, status.status)?;
    if let Some(created) = status.created_date_time_utc {
        writeln!(out, "Created: {}", created.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    if let Some(last) = status.last_action_date_time_utc {
        writeln!(out, "Last action: {}", last.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    let s = &status.summary;
    writeln!(
        out,
        "Documents: total={}, succeeded={}, failed={}, in progress={}, not started={}, cancelled={}",
        s.total, s.success, s.failed, s.in_progress, s.not_yet_started, s.cancelled
    )?;
    writeln!(out, "Characters charged: {}", s.total_character_charged)
}
