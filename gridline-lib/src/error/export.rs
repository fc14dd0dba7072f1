//! Export error types

/// Errors that can occur while exporting table rows.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing to the output sink failed.
    #[error("Export write failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The in-memory export buffer was not valid UTF-8.
    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
