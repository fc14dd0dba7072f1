//! Table configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pipeline::{FilterMode, SelectionMode};

/// Defaults a table starts from.
///
/// Deserializes from JSON with every field optional.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridline_lib::config::TableConfig;
///
/// let config = TableConfig::default()
///     .with_page_size(25)
///     .with_debounce(Duration::from_millis(300));
/// assert!(config.validate().is_ok());
///
/// let parsed = TableConfig::from_json_str(r#"{ "page_size": 50 }"#).unwrap();
/// assert_eq!(parsed.page_size, 50);
/// assert_eq!(parsed.debounce_ms, 150);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Quiet period before typed filter text is applied, in milliseconds.
    ///
    /// Default: 150
    pub debounce_ms: u64,

    /// Default: substring
    pub filter_mode: FilterMode,

    /// Default: multi
    pub selection_mode: SelectionMode,

    /// Rows per page of the print export.
    ///
    /// Default: 40
    pub print_rows_per_page: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            debounce_ms: 150,
            filter_mode: FilterMode::Substring,
            selection_mode: SelectionMode::Multi,
            print_rows_per_page: 40,
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn with_print_rows_per_page(mut self, rows: usize) -> Self {
        self.print_rows_per_page = rows;
        self
    }

    /// Filter debounce as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be at least 1"));
        }
        if self.print_rows_per_page == 0 {
            return Err(ConfigError::invalid("print_rows_per_page", "must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
