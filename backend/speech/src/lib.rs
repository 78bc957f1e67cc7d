//! Speech services: synthesis, recognition, fast transcription, language
//! identification, speech translation and speaker verification.

pub mod endpoints;
pub mod recognition;
pub mod speaker;
pub mod ssml;
pub mod synthesis;
pub mod translation;

pub use endpoints::{SpeechEndpoints, SERVICE_NAME};
pub use recognition::{
    recognition_path, CombinedPhrase, LanguageIdentification, RecognitionOutcome,
    SpeechRecognizer, TranscribedPhrase, Transcription, DEFAULT_CANDIDATE_LOCALES,
    DEFAULT_RECOGNITION_LANGUAGE, SAMPLE_ENROLL_AUDIO, SAMPLE_MULTI_LANGUAGE_AUDIO,
};
pub use speaker::{
    EnrollmentResult, SpeakerVerificationClient, VerificationDecision, VerificationResult,
    VoiceProfile, DEFAULT_PROFILE_LOCALE,
};
pub use ssml::{escape_xml, voice_locale, Ssml, VoiceSegment};
pub use synthesis::{
    multi_voice_sample, SpeechSynthesizer, SynthesisRequest, SynthesizedAudio, VoiceInfo,
    DEFAULT_OUTPUT_FORMAT, DEFAULT_VOICE, SAMPLE_SYNTHESIS_TEXT,
};
pub use translation::{
    language_of, SpeechTranslationOutcome, SpeechTranslator, DEFAULT_SOURCE_LANGUAGE,
    DEFAULT_TARGET_LANGUAGES,
};
