//! Prompt shields: jailbreak and indirect prompt-injection detection.

use std::time::Duration;

use cogforge_core::{CogError, CogResult};
use serde::Serialize;
use tracing::info;

use crate::client::{ContentSafetyClient, API_VERSION};
use crate::models::ShieldPromptResult;

/// Upper bound for shield and protected material calls.
pub const BOUNDED_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShieldPromptRequest<'a> {
    user_prompt: &'a str,
    documents: &'a [String],
}

impl ContentSafetyClient {
    /// Client whose per-request timeout is at most [`BOUNDED_CALL_TIMEOUT`].
    pub(crate) fn bounded(&self) -> ContentSafetyClient {
        let timeout = self
            .http
            .timeout()
            .map(|t| t.min(BOUNDED_CALL_TIMEOUT))
            .unwrap_or(BOUNDED_CALL_TIMEOUT);
        self.clone().with_timeout(timeout)
    }

    /// `POST /contentsafety/text:shieldPrompt`
    pub async fn shield_prompt(
        &self,
        user_prompt: &str,
        documents: &[String],
    ) -> CogResult<ShieldPromptResult> {
        if user_prompt.trim().is_empty() {
            return Err(CogError::invalid_request("user prompt is empty"));
        }
        info!(documents = documents.len(), "Shielding prompt");
        let body = ShieldPromptRequest {
            user_prompt,
            documents,
        };
        self.bounded()
            .http
            .post_json(
                "shield prompt",
                &format!("/contentsafety/text:shieldPrompt?api-version={API_VERSION}"),
                &body,
            )
            .await
    }
}
