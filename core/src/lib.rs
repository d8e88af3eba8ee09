//! Root of the `radar-core` library.

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output goes through the CLI renderers or the tracing stack.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod interpret;
pub mod issues;
pub mod prompts;
pub mod risk;
pub mod timeline;

pub use analysis::Analyzer;
pub use analysis::Report;
pub use analysis::ReportStatus;
pub use error::RadarErr;
pub use issues::IssueRecord;
pub use issues::Severity;
pub use risk::RiskLevel;
pub use risk::RiskRating;
pub use risk::classify;
pub use timeline::Timeline;
pub use timeline::TimelinePoint;
