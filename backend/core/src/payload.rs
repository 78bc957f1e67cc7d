//! Request payloads accepted by the analysis clients.

use std::fmt;

use bytes::Bytes;

use crate::error::{CogError, CogResult};

/// What one analysis call sends to the remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    Text(String),
    Image(Bytes),
    Audio(Bytes),
    Document(Bytes),
    Prompt {
        user_prompt: String,
        documents: Vec<String>,
    },
}

/// Discriminant of a [`RequestPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Image,
    Audio,
    Document,
    Prompt,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

impl RequestPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn prompt(user_prompt: impl Into<String>, documents: Vec<String>) -> Self {
        Self::Prompt {
            user_prompt: user_prompt.into(),
            documents,
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Text(_) => PayloadKind::Text,
            Self::Image(_) => PayloadKind::Image,
            Self::Audio(_) => PayloadKind::Audio,
            Self::Document(_) => PayloadKind::Document,
            Self::Prompt { .. } => PayloadKind::Prompt,
        }
    }

    /// Size of the payload in bytes (text counted as UTF-8).
    pub fn len(&self) -> usize {
        match self {
            Self::Text(t) => t.len(),
            Self::Image(b) | Self::Audio(b) | Self::Document(b) => b.len(),
            Self::Prompt {
                user_prompt,
                documents,
            } => user_prompt.len() + documents.iter().map(String::len).sum::<usize>(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject payloads the services would refuse anyway.
    pub fn validate(&self) -> CogResult<()> {
        match self {
            Self::Text(t) if t.trim().is_empty() => {
                Err(CogError::invalid_request("text to analyze is empty"))
            }
            Self::Prompt { user_prompt, .. } if user_prompt.trim().is_empty() => {
                Err(CogError::invalid_request("user prompt is empty"))
            }
            Self::Image(b) | Self::Audio(b) | Self::Document(b) if b.is_empty() => Err(
                CogError::invalid_request(format!("{} payload is empty", self.kind())),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(RequestPayload::text("hi").kind(), PayloadKind::Text);
        assert_eq!(
            RequestPayload::Image(Bytes::from_static(b"\x89PNG")).kind(),
            PayloadKind::Image
        );
        assert_eq!(
            RequestPayload::prompt("hi", vec![]).kind(),
            PayloadKind::Prompt
        );
    }

    #[test]
    fn empty_payloads_are_rejected() {
        assert!(RequestPayload::text("   ").validate().is_err());
        assert!(RequestPayload::Audio(Bytes::new()).validate().is_err());
        assert!(RequestPayload::prompt("", vec!["doc".into()]).validate().is_err());
        assert!(RequestPayload::text("hello").validate().is_ok());
    }

    #[test]
    fn prompt_length_counts_documents() {
        let p = RequestPayload::prompt("abc", vec!["de".into(), "f".into()]);
        assert_eq!(p.len(), 6);
    }
}
