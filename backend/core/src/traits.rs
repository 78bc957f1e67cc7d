use async_trait::async_trait;

use crate::error::{CogError, CogResult};
use crate::payload::{PayloadKind, RequestPayload};

/// A remote analysis service that accepts a [`RequestPayload`].
///
/// Implemented by every client whose operation maps one payload onto one
/// result (moderation, image analysis, recognition, translation).
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Typed result of one call.
    type Output: Send;

    /// Service name used in logs and errors (e.g., "ContentSafety").
    fn service(&self) -> &str;

    /// Payload kinds this service understands.
    fn accepts(&self, kind: PayloadKind) -> bool;

    /// Send the payload and decode the result.
    async fn analyze(&self, payload: RequestPayload) -> CogResult<Self::Output>;

    /// Reject empty payloads and kinds the service does not handle, before any I/O.
    fn check(&self, payload: &RequestPayload) -> CogResult<()> {
        if !self.accepts(payload.kind()) {
            return Err(CogError::invalid_request(format!(
                "{} cannot analyze {} payloads",
                self.service(),
                payload.kind()
            )));
        }
        payload.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Analyzer for Echo {
        type Output = usize;

        fn service(&self) -> &str {
            "Echo"
        }

        fn accepts(&self, kind: PayloadKind) -> bool {
            kind == PayloadKind::Text
        }

        async fn analyze(&self, payload: RequestPayload) -> CogResult<usize> {
            self.check(&payload)?;
            Ok(payload.len())
        }
    }

    #[tokio::test]
    async fn check_rejects_foreign_kinds() {
        let err = Echo
            .analyze(RequestPayload::prompt("hi", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid request: Echo cannot analyze prompt payloads");
        assert_eq!(Echo.analyze(RequestPayload::text("four")).await.unwrap(), 4);
    }
}
