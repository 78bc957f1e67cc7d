//! `cogforge-report`: plain-text reports for analysis results.
//!
//! [`render`] turns any [`AnalysisOutcome`] into deterministic text;
//! the same outcome always renders to the same bytes.

mod document;
pub mod outcome;
pub mod render;
mod safety;
mod speech;
pub mod table;
mod translation;
mod vision;

pub use outcome::AnalysisOutcome;
pub use render::{render, write_report};
pub use table::{render_table, Align, Column};
