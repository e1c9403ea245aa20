//! # ddrconf-report
//!
//! Rendering for ddrconf:
//!
//! - [`TextReport`] -- the colored, human-readable comparison report
//! - [`render_json`] -- the same report as structured JSON
//! - [`Dump`] -- a plain listing of one dataset with sizes and checksums

pub mod dump;
pub mod error;
mod style;
pub mod text;

use tracing::debug;

use ddrconf_diff::TimingReport;

pub use dump::{render_dump, Dump};
pub use error::{ReportError, ReportResult};
pub use text::{render_text, TextOptions, TextReport, DEFAULT_MAX_BLOCK_ROWS};

/// Serialize a comparison report as pretty-printed JSON.
pub fn render_json(report: &TimingReport) -> ReportResult<String> {
    let json = serde_json::to_string_pretty(report)?;
    debug!(bytes = json.len(), "rendered JSON report");
    Ok(json)
}
