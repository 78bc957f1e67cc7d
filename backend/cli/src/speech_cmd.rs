//! `cogforge speech ...`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Subcommand;
use cogforge_config::{CogForgeConfig, ServiceSection};
use cogforge_report::AnalysisOutcome;
use cogforge_speech::{
    multi_voice_sample, SpeakerVerificationClient, SpeechEndpoints, SpeechRecognizer,
    SpeechSynthesizer, SpeechTranslator, SynthesisRequest, DEFAULT_CANDIDATE_LOCALES,
    DEFAULT_OUTPUT_FORMAT, DEFAULT_PROFILE_LOCALE, DEFAULT_SOURCE_LANGUAGE,
    DEFAULT_TARGET_LANGUAGES, SAMPLE_ENROLL_AUDIO, SAMPLE_MULTI_LANGUAGE_AUDIO,
    SAMPLE_SYNTHESIS_TEXT,
};
use cogforge_translation::Translator;
use tracing::{info, warn};

use crate::{read_input, Report};

const DEFAULT_AUDIO_OUTPUT: &str = "output.wav";
const DEFAULT_MULTI_VOICE_OUTPUT: &str = "multi_voice_output.wav";

#[derive(Subcommand)]
pub enum SpeechCommand {
    /// Synthesize text to an audio file
    Synthesize {
        text: Option<String>,
        /// Voice short name; the configured voice when omitted
        #[arg(long)]
        voice: Option<String>,
        #[arg(long, default_value = DEFAULT_AUDIO_OUTPUT)]
        output: PathBuf,
        #[arg(long, default_value = DEFAULT_OUTPUT_FORMAT)]
        format: String,
    },
    /// Synthesize a three-voice conversation
    MultiVoice {
        #[arg(long, default_value = DEFAULT_MULTI_VOICE_OUTPUT)]
        output: PathBuf,
    },
    /// List the voices of the region
    Voices {
        /// Only voices whose locale starts with this prefix
        #[arg(long)]
        locale: Option<String>,
    },
    /// Recognize a short utterance
    Recognize {
        path: Option<PathBuf>,
        /// Recognition language; the configured language when omitted
        #[arg(long)]
        language: Option<String>,
    },
    /// Transcribe a recording with fast transcription
    Transcribe {
        path: Option<PathBuf>,
        /// Comma-separated locales
        #[arg(long, value_delimiter = ',')]
        locales: Vec<String>,
    },
    /// Identify the spoken language among candidate locales
    IdentifyLanguage {
        path: Option<PathBuf>,
        #[arg(long, value_delimiter = ',')]
        candidates: Vec<String>,
    },
    /// Recognize speech and translate it
    Translate {
        path: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_SOURCE_LANGUAGE)]
        from: String,
        /// Comma-separated target languages
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
    },
    /// Enroll audio into a voice profile, creating one when no id is given
    SpeakerEnroll {
        path: Option<PathBuf>,
        #[arg(long)]
        profile: Option<String>,
        #[arg(long, default_value = DEFAULT_PROFILE_LOCALE)]
        locale: String,
    },
    /// Verify a speaker against an enrolled profile
    SpeakerVerify {
        #[arg(long)]
        profile: String,
        path: Option<PathBuf>,
    },
    /// Delete a voice profile
    SpeakerDelete {
        #[arg(long)]
        profile: String,
    },
}

struct SpeechSetup {
    endpoints: SpeechEndpoints,
    api_key: String,
    timeout: std::time::Duration,
}

impl SpeechSetup {
    fn from_config(config: &CogForgeConfig) -> Result<Self> {
        let credentials = config.speech_credentials()?;
        Ok(Self {
            endpoints: SpeechEndpoints::from_credentials(&credentials)?,
            api_key: credentials.api_key,
            timeout: config.http_timeout(),
        })
    }

    fn synthesizer(&self) -> Result<SpeechSynthesizer> {
        Ok(SpeechSynthesizer::new(&self.endpoints, &self.api_key, Some(self.timeout))?)
    }

    fn recognizer(&self) -> Result<SpeechRecognizer> {
        Ok(SpeechRecognizer::new(&self.endpoints, &self.api_key, Some(self.timeout))?)
    }

    fn speaker(&self) -> Result<SpeakerVerificationClient> {
        Ok(SpeakerVerificationClient::new(&self.endpoints, &self.api_key, Some(self.timeout))?)
    }
}

fn or_defaults(values: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if values.is_empty() {
        defaults.iter().map(|v| v.to_string()).collect()
    } else {
        values
    }
}

/// Create a profile and enroll into it; the profile is removed again when
/// enrollment fails.
async fn enroll_new_profile(
    client: &SpeakerVerificationClient,
    locale: &str,
    audio: Bytes,
) -> Result<Vec<Report>> {
    let created = client.create_profile(locale).await?;
    match client.enroll(&created.profile_id, audio).await {
        Ok(enrollment) => Ok(vec![
            Report::unlabeled(AnalysisOutcome::VoiceProfile(created)),
            Report::unlabeled(AnalysisOutcome::Enrollment(enrollment)),
        ]),
        Err(err) => {
            if let Err(cleanup) = client.delete_profile(&created.profile_id).await {
                warn!(profile_id = %created.profile_id, error = %cleanup, "Failed to remove voice profile");
            }
            Err(err).context("Voice profile enrollment failed")
        }
    }
}

async fn synthesize_to_file(
    synthesizer: &SpeechSynthesizer,
    request: &SynthesisRequest,
    output: &Path,
) -> Result<Report> {
    let audio = synthesizer.synthesize(request).await?;
    tokio::fs::write(output, &audio.audio)
        .await
        .with_context(|| format!("Failed to write audio to {}", output.display()))?;
    info!(path = %output.display(), bytes = audio.audio.len(), "Audio written");
    Ok(Report::unlabeled(AnalysisOutcome::SpeechSynthesized {
        path: output.display().to_string(),
        bytes: audio.audio.len(),
        content_type: audio.content_type,
    }))
}

pub async fn run(cmd: SpeechCommand, config: &CogForgeConfig) -> Result<Vec<Report>> {
    let setup = SpeechSetup::from_config(config)?;
    match cmd {
        SpeechCommand::Synthesize {
            text,
            voice,
            output,
            format,
        } => {
            let text = text.unwrap_or_else(|| SAMPLE_SYNTHESIS_TEXT.to_string());
            let voice = voice.unwrap_or_else(|| config.speech_voice().to_string());
            let request = SynthesisRequest::text(&voice, text).with_output_format(format);
            let report = synthesize_to_file(&setup.synthesizer()?, &request, &output).await?;
            Ok(vec![report])
        }
        SpeechCommand::MultiVoice { output } => {
            let request = SynthesisRequest::new(multi_voice_sample());
            let report = synthesize_to_file(&setup.synthesizer()?, &request, &output).await?;
            Ok(vec![report])
        }
        SpeechCommand::Voices { locale } => {
            let mut voices = setup.synthesizer()?.list_voices().await?;
            if let Some(prefix) = locale {
                let prefix = prefix.to_ascii_lowercase();
                voices.retain(|v| v.locale.to_ascii_lowercase().starts_with(&prefix));
            }
            Ok(vec![Report::unlabeled(AnalysisOutcome::Voices(voices))])
        }
        SpeechCommand::Recognize { path, language } => {
            let language = language.unwrap_or_else(|| config.speech_language().to_string());
            let audio = read_input(path.as_deref(), SAMPLE_ENROLL_AUDIO).await?;
            let outcome = setup.recognizer()?.recognize(audio, &language).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::Recognition(outcome))])
        }
        SpeechCommand::Transcribe { path, locales } => {
            let locales = or_defaults(locales, &[config.speech_language()]);
            let audio = read_input(path.as_deref(), SAMPLE_MULTI_LANGUAGE_AUDIO).await?;
            let transcription = setup.recognizer()?.transcribe(audio, &locales).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::Transcription(transcription))])
        }
        SpeechCommand::IdentifyLanguage { path, candidates } => {
            let candidates = or_defaults(candidates, &DEFAULT_CANDIDATE_LOCALES);
            let audio = read_input(path.as_deref(), SAMPLE_MULTI_LANGUAGE_AUDIO).await?;
            let identified = setup
                .recognizer()?
                .identify_language(audio, &candidates)
                .await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::LanguageIdentification(
                identified,
            ))])
        }
        SpeechCommand::Translate { path, from, to } => {
            let targets = or_defaults(to, &DEFAULT_TARGET_LANGUAGES);
            let credentials = config.credentials(ServiceSection::Translator)?;
            let translator =
                Translator::from_credentials(&credentials)?.with_timeout(config.http_timeout());
            let audio = read_input(path.as_deref(), SAMPLE_ENROLL_AUDIO).await?;
            let outcome = SpeechTranslator::new(setup.recognizer()?, translator)
                .translate_speech(audio, &from, &targets)
                .await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::SpeechTranslation(outcome))])
        }
        SpeechCommand::SpeakerEnroll {
            path,
            profile,
            locale,
        } => {
            let client = setup.speaker()?;
            let audio = read_input(path.as_deref(), SAMPLE_ENROLL_AUDIO).await?;
            let Some(profile_id) = profile else {
                return enroll_new_profile(&client, &locale, audio).await;
            };
            let enrollment = client.enroll(&profile_id, audio).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::Enrollment(enrollment))])
        }
        SpeechCommand::SpeakerVerify { profile, path } => {
            let audio = read_input(path.as_deref(), SAMPLE_ENROLL_AUDIO).await?;
            let result = setup.speaker()?.verify(&profile, audio).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::Verification(result))])
        }
        SpeechCommand::SpeakerDelete { profile } => {
            setup.speaker()?.delete_profile(&profile).await?;
            Ok(vec![Report::unlabeled(AnalysisOutcome::ProfileDeleted {
                profile_id: profile,
            })])
        }
    }
}
