//! Structured error types for xmltv-grid.
//!
//! Only document-level failures are reported. Per-record problems are
//! absorbed into the grid and surfaced through [`crate::grid::LoadReport`],
//! unless strict timestamp parsing is requested.

use crate::types::TimestampField;

/// All errors that can occur while loading a schedule.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The markup parsed but does not form a complete document.
    #[error("Malformed document: {0}")]
    Decode(String),

    /// Unparsable timestamp, reported only when strict timestamps are enabled.
    #[error("Programme {index}: invalid {field} timestamp {value:?}")]
    Timestamp {
        index: usize,
        field: TimestampField,
        value: String,
    },

    /// JSON serialization error.
    #[error("JSON serialization: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a schedule file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<std::str::Utf8Error> for GridError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Decode(format!("invalid UTF-8: {e}"))
    }
}

impl From<quick_xml::events::attributes::AttrError> for GridError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(e.into())
    }
}
