//! Every result the formatter knows how to print.

use cogforge_document::{IdDocumentSummary, InvoiceSummary};
use cogforge_safety::{
    AnalyzeImageResult, AnalyzeTextResult, ProtectedMaterialResult, ShieldPromptResult,
    TextBlocklist, TextBlocklistItem,
};
use cogforge_speech::{
    EnrollmentResult, LanguageIdentification, RecognitionOutcome, SpeechTranslationOutcome,
    Transcription, VerificationResult, VoiceInfo, VoiceProfile,
};
use cogforge_translation::{BatchStatus, LanguageDetection, TranslationResult};
use cogforge_vision::{DetectedFace, ImageAnalysisResult, ImagePrediction};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    TextModeration(AnalyzeTextResult),
    ImageModeration(AnalyzeImageResult),
    PromptShield(ShieldPromptResult),
    ProtectedMaterial(ProtectedMaterialResult),
    BlocklistSaved {
        blocklist: TextBlocklist,
        created: bool,
    },
    Blocklists(Vec<TextBlocklist>),
    BlocklistItems {
        blocklist_name: String,
        items: Vec<TextBlocklistItem>,
    },
    ImageAnalysis(ImageAnalysisResult),
    Faces(Vec<DetectedFace>),
    Predictions {
        detection: bool,
        prediction: ImagePrediction,
    },
    Invoices(Vec<InvoiceSummary>),
    IdDocuments(Vec<IdDocumentSummary>),
    SpeechSynthesized {
        path: String,
        bytes: usize,
        content_type: String,
    },
    Voices(Vec<VoiceInfo>),
    Recognition(RecognitionOutcome),
    Transcription(Transcription),
    LanguageIdentification(LanguageIdentification),
    SpeechTranslation(SpeechTranslationOutcome),
    VoiceProfile(VoiceProfile),
    Enrollment(EnrollmentResult),
    Verification(VerificationResult),
    ProfileDeleted {
        profile_id: String,
    },
    Translations(Vec<TranslationResult>),
    LanguageDetections(Vec<LanguageDetection>),
    DocumentTranslated {
        original: String,
        translated: String,
    },
    BatchStarted {
        status_url: String,
    },
    BatchStatus(BatchStatus),
}
