//! `cogforge-safety`: content moderation client.
//!
//! Text and image harm analysis, text blocklists, prompt shields and
//! protected material detection against one Content Safety resource.

pub mod blocklist;
pub mod client;
pub mod models;
pub mod protected;
pub mod samples;
pub mod shield;

pub use blocklist::BlocklistClient;
pub use client::{ContentSafetyClient, SafetyAnalysis, API_VERSION, MAX_TEXT_CHARS, SERVICE_NAME};
pub use models::{
    AnalyzeImageOptions, AnalyzeImageResult, AnalyzeTextOptions, AnalyzeTextResult,
    AttackAnalysis, BlocklistMatch, BlocklistUpsert, CategoryAnalysis, CodeCitation, OutputType,
    ProtectedMaterialAnalysis, ProtectedMaterialResult, ShieldPromptResult, TextBlocklist,
    TextBlocklistItem,
};
pub use protected::CODE_API_VERSION;
pub use shield::BOUNDED_CALL_TIMEOUT;
