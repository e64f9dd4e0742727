use crate::utils::config::DEFAULT_REPORT_PATH;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// JSON file holding the entries
    pub input: Option<PathBuf>,

    /// HTTP endpoint returning the entries
    pub url: Option<String>,

    /// Correlation key of the trace to analyze (when the input holds several)
    pub trace: Option<String>,

    /// Output path for JSON report
    pub output_json: PathBuf,

    /// Optional TOML analysis config
    pub config_path: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: None,
            url: None,
            trace: None,
            output_json: PathBuf::from(DEFAULT_REPORT_PATH),
            config_path: None,
            print_summary: false,
        }
    }
}
