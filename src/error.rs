use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the host when a report cannot be produced.
///
/// Per-test anomalies (missing start time, absent exception info) are never
/// errors; they are logged and recovered inside the collector.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Template file could not be read
    #[error("failed to load template {}: {source}", .path.display())]
    TemplateLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Template parsed or rendered with an error
    #[error("failed to render template '{name}': {source}")]
    TemplateRender { name: String, source: tera::Error },

    /// Rendered report could not be written
    #[error("failed to write report {}: {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization failed (search index)
    #[error("failed to serialize {context}: {source}")]
    Serialize {
        context: String,
        source: serde_json::Error,
    },

    /// The event stream could not be read
    #[error("failed to read test events: {0}")]
    EventRead(#[source] std::io::Error),

    /// A line that looked like a JSON event did not parse
    #[error("malformed test event on line {line}: {source}")]
    EventParse {
        line: usize,
        source: serde_json::Error,
    },
}
