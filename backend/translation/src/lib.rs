//! Translator text APIs and document translation.

pub mod document;
pub mod text;

pub use document::{
    BatchInput, BatchRequest, BatchStatus, DocumentTranslationClient, SourceInput, StatusSummary,
    TargetInput, DEFAULT_TARGET_LANGUAGE, SAMPLE_DOCUMENT_PATH,
};
pub use text::{
    translate_path, DetectedLanguage, LanguageDetection, Translation, TranslationResult,
    Translator, DEFAULT_ENDPOINT, DEFAULT_FROM, DEFAULT_TO, SAMPLE_TEXT,
};
