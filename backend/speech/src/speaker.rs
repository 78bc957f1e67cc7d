//! Text-independent speaker verification profiles.

use std::time::Duration;

use bytes::Bytes;
use cogforge_core::{CogError, CogResult, ServiceClient, ServiceCredentials};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::endpoints::{host_client, SpeechEndpoints};
use crate::recognition::WAV_CONTENT_TYPE;

pub const SPEAKER_API_VERSION: &str = "2021-09-05";
pub const DEFAULT_PROFILE_LOCALE: &str = "en-us";

const PROFILES_PATH: &str = "/speaker-recognition/verification/text-independent/profiles";

#[derive(Serialize)]
struct CreateProfile<'a> {
    locale: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub profile_id: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub enrollment_status: Option<String>,
    #[serde(default)]
    pub remaining_enrollments_speech_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResult {
    pub profile_id: String,
    pub enrollment_status: String,
    #[serde(default)]
    pub enrollments_count: u32,
    #[serde(default)]
    pub enrollments_speech_length: Option<f64>,
    #[serde(default)]
    pub remaining_enrollments_speech_length: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationDecision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub recognition_result: VerificationDecision,
    pub score: f64,
}

impl VerificationResult {
    pub fn accepted(&self) -> bool {
        self.recognition_result == VerificationDecision::Accept
    }
}

#[derive(Debug, Clone)]
pub struct SpeakerVerificationClient {
    http: ServiceClient,
}

fn require_profile(profile_id: &str) -> CogResult<()> {
    if profile_id.trim().is_empty() {
        return Err(CogError::invalid_request("profile id is required"));
    }
    Ok(())
}

fn require_audio(audio: &Bytes) -> CogResult<()> {
    if audio.is_empty() {
        return Err(CogError::invalid_request("audio payload is empty"));
    }
    Ok(())
}

impl SpeakerVerificationClient {
    pub fn new(endpoints: &SpeechEndpoints, api_key: &str, timeout: Option<Duration>) -> CogResult<Self> {
        Ok(Self {
            http: host_client(&endpoints.api, api_key, timeout)?,
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Self::new(
            &SpeechEndpoints::from_credentials(credentials)?,
            &credentials.api_key,
            None,
        )
    }

    pub async fn create_profile(&self, locale: &str) -> CogResult<VoiceProfile> {
        let profile: VoiceProfile = self
            .http
            .post_json(
                "create voice profile",
                &format!("{PROFILES_PATH}?api-version={SPEAKER_API_VERSION}"),
                &CreateProfile { locale },
            )
            .await?;
        info!(profile_id = %profile.profile_id, "Voice profile created");
        Ok(profile)
    }

    pub async fn enroll(&self, profile_id: &str, audio: Bytes) -> CogResult<EnrollmentResult> {
        require_profile(profile_id)?;
        require_audio(&audio)?;
        let result: EnrollmentResult = self
            .http
            .post_bytes(
                "enroll voice profile",
                &format!("{PROFILES_PATH}/{profile_id}/enrollments?api-version={SPEAKER_API_VERSION}"),
                audio,
                WAV_CONTENT_TYPE,
            )
            .await?;
        info!(profile_id, status = %result.enrollment_status, "Enrollment submitted");
        Ok(result)
    }

    pub async fn verify(&self, profile_id: &str, audio: Bytes) -> CogResult<VerificationResult> {
        require_profile(profile_id)?;
        require_audio(&audio)?;
        self.http
            .post_bytes(
                "verify speaker",
                &format!("{PROFILES_PATH}/{profile_id}:verify?api-version={SPEAKER_API_VERSION}"),
                audio,
                WAV_CONTENT_TYPE,
            )
            .await
    }

    pub async fn delete_profile(&self, profile_id: &str) -> CogResult<()> {
        require_profile(profile_id)?;
        self.http
            .delete(
                "delete voice profile",
                &format!("{PROFILES_PATH}/{profile_id}?api-version={SPEAKER_API_VERSION}"),
            )
            .await?;
        info!(profile_id, "Voice profile deleted");
        Ok(())
    }
}
