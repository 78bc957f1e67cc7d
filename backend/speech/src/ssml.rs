//! SSML documents with one or more `<voice>` segments.

use cogforge_core::{CogError, CogResult};

const SPEAK_NS: &str = "http://www.w3.org/2001/10/synthesis";
const MSTTS_NS: &str = "https://www.w3.org/2001/mstts";

/// Escape text for use inside SSML element content or attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Locale prefix of a voice name: `fr-CA-JeanNeural` → `fr-CA`.
pub fn voice_locale(voice: &str) -> Option<String> {
    let mut parts = voice.splitn(3, '-');
    let language = parts.next()?;
    let region = parts.next()?;
    parts.next()?;
    Some(format!("{language}-{region}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSegment {
    pub voice: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ssml {
    lang: String,
    segments: Vec<VoiceSegment>,
}

impl Ssml {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            segments: Vec::new(),
        }
    }

    /// Single-voice document whose `xml:lang` follows the voice locale.
    pub fn single(voice: &str, text: impl Into<String>) -> Self {
        let lang = voice_locale(voice).unwrap_or_else(|| "en-US".to_string());
        Self::new(lang).voice(voice, text)
    }

    pub fn voice(mut self, voice: impl Into<String>, text: impl Into<String>) -> Self {
        self.segments.push(VoiceSegment {
            voice: voice.into(),
            text: text.into(),
        });
        self
    }

    pub fn segments(&self) -> &[VoiceSegment] {
        &self.segments
    }

    /// Fails when there is nothing to say.
    pub fn validate(&self) -> CogResult<()> {
        if self.segments.iter().all(|s| s.text.trim().is_empty()) {
            return Err(CogError::invalid_request("text to synthesize is empty"));
        }
        if let Some(segment) = self.segments.iter().find(|s| s.voice.trim().is_empty()) {
            return Err(CogError::invalid_request(format!(
                "no voice given for '{}'",
                segment.text
            )));
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "<speak version='1.0' xmlns='{SPEAK_NS}' xmlns:mstts='{MSTTS_NS}' xml:lang='{}'>",
            escape_xml(&self.lang)
        );
        for segment in &self.segments {
            out.push_str(&format!(
                "<voice name='{}'>{}</voice>",
                escape_xml(&segment.voice),
                escape_xml(segment.text.trim())
            ));
        }
        out.push_str("</speak>");
        out
    }
}
