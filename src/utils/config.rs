//! Configuration and constants for the analyzer and CLI.

use super::error::ConfigError;
use crate::correlate::CorrelationRules;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default timeout for HTTP entry sources
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default path for the JSON report
pub const DEFAULT_REPORT_PATH: &str = "trace-report.json";

/// Default number of spans listed in the text summary
pub const DEFAULT_SUMMARY_ROWS: usize = 20;

/// Upper bound for `summary_rows`
pub const MAX_SUMMARY_ROWS: usize = 1000;

// Field names that may hold the entry array when the payload is an object
// (different ingestion endpoints wrap results differently)
pub const ENTRY_FIELD_NAMES: &[&str] = &["entries", "logs", "records", "result"];

/// Analysis configuration
///
/// Passed explicitly into the pipeline; nothing here is process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Which identifiers group entries into a trace, in precedence order
    pub correlation: CorrelationRules,

    /// Number of spans printed by the text summary
    pub summary_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation: CorrelationRules::default(),
            summary_rows: DEFAULT_SUMMARY_ROWS,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading analysis config from: {}", path.display());

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: AnalysisConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.summary_rows == 0 {
            return Err(ConfigError::Invalid(
                "summary_rows must be greater than 0".to_string(),
            ));
        }

        if self.summary_rows > MAX_SUMMARY_ROWS {
            return Err(ConfigError::Invalid(format!(
                "summary_rows is too large (max {})",
                MAX_SUMMARY_ROWS
            )));
        }

        Ok(())
    }
}
