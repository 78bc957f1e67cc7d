use std::fmt::{self, Write};

use cogforge_speech::{
    EnrollmentResult, LanguageIdentification, RecognitionOutcome, SpeechTranslationOutcome,
    Transcription, VerificationResult, VoiceInfo, VoiceProfile,
};

use crate::table::{render_table, Column};

pub(crate) fn synthesized(
    out: &mut impl Write,
    path: &str,
    bytes: usize,
    content_type: &str,
) -> fmt::Result {
    writeln!(out, "Speech synthesis completed successfully.")?;
    writeln!(out, "Wrote {bytes} bytes of {content_type} to {path}")
}

pub(crate) fn voices(out: &mut impl Write, voices: &[VoiceInfo]) -> fmt::Result {
    writeln!(out, "{} voice(s) available.", voices.len())?;
    let rows: Vec<Vec<String>> = voices
        .iter()
        .map(|v| {
            vec![
                v.short_name.clone(),
                v.locale.clone(),
                v.gender.clone().unwrap_or_default(),
                v.voice_type.clone().unwrap_or_default(),
            ]
        })
        .collect();
    out.write_str(&render_table(
        &[
            Column::left("Voice"),
            Column::left("Locale"),
            Column::left("Gender"),
            Column::left("Type"),
        ],
        &rows,
    ))
}

pub(crate) fn recognition(out: &mut impl Write, outcome: &RecognitionOutcome) -> fmt::Result {
    match outcome {
        RecognitionOutcome::Recognized { text, .. } => writeln!(out, "Recognized: {text}"),
        RecognitionOutcome::NoMatch => writeln!(out, "No speech could be recognized."),
        RecognitionOutcome::Canceled { reason } => writeln!(out, "Canceled: {reason}"),
    }
}

pub(crate) fn transcription(out: &mut impl Write, transcription: &Transcription) -> fmt::Result {
    writeln!(out, "Transcription: {}", transcription.text())?;
    for phrase in &transcription.phrases {
        writeln!(
            out,
            "  [{} ms +{} ms] ({}) {}",
            phrase.offset_milliseconds,
            phrase.duration_milliseconds,
            phrase.locale.as_deref().unwrap_or("?"),
            phrase.text
        )?;
    }
    Ok(())
}

pub(crate) fn language(out: &mut impl Write, identified: &LanguageIdentification) -> fmt::Result {
    writeln!(out, "Recognized: {}", identified.text)?;
    writeln!(
        out,
        "Detected language: {}",
        identified.language.as_deref().unwrap_or("unknown")
    )
}

pub(crate) fn speech_translation(
    out: &mut impl Write,
    outcome: &SpeechTranslationOutcome,
) -> fmt::Result {
    match outcome {
        SpeechTranslationOutcome::Translated {
            recognized,
            translations,
        } => {
            writeln!(out, "Recognized: {recognized}")?;
            for t in translations {
                writeln!(out, "Translated ({}): {}", t.to, t.text)?;
            }
            Ok(())
        }
        SpeechTranslationOutcome::NoMatch => writeln!(out, "No speech could be recognized."),
        SpeechTranslationOutcome::Canceled { reason } => writeln!(out, "Canceled: {reason}"),
    }
}

pub(crate) fn profile(out: &mut impl Write, profile: &VoiceProfile) -> fmt::Result {
    writeln!(out, "Voice profile created. ProfileId: {}", profile.profile_id)?;
    if let Some(status) = &profile.enrollment_status {
        writeln!(out, "Enrollment status: {status}")?;
    }
    Ok(())
}

pub(crate) fn enrollment(out: &mut impl Write, result: &EnrollmentResult) -> fmt::Result {
    writeln!(out, "Enrollment status: {}", result.enrollment_status)?;
    if let Some(remaining) = result.remaining_enrollments_speech_length {
        writeln!(out, "Remaining speech needed: {remaining}s")?;
    }
    if result.enrollment_status.eq_ignore_ascii_case("Enrolled") {
        writeln!(out, "Your profile is ready. ProfileId: {}", result.profile_id)?;
    }
    Ok(())
}

pub(crate) fn verification(out: &mut impl Write, result: &VerificationResult) -> fmt::Result {
    if result.accepted() {
        writeln!(out, "Verification successful! Score: {}", result.score)
    } else {
        writeln!(out, "Verification failed. Reason: Reject, Score: {}", result.score)
    }
}
