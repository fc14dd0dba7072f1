//! CLI error type

use std::io;
use std::path::PathBuf;

use gridline_lib::error::{ConfigError, ExportError};

/// Errors that end a `gridline` run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a JSON array of row objects: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown column `{0}`")]
    UnknownColumn(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn create(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }
}
