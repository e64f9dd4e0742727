//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads entries from a file or HTTP endpoint
//! 2. Resolves the correlation key and picks one trace
//! 3. Builds the span forest and critical path
//! 4. Writes the JSON report

use super::models::AnalyzeArgs;
use crate::analysis::{analyze_trace, TraceAnalysis};
use crate::correlate::{partition_by_correlation, resolve_correlation, CorrelationKind};
use crate::model::LogEntry;
use crate::output::{generate_text_summary, write_report};
use crate::source::{EntrySource, FileSource, HttpSource};
use crate::utils::config::AnalysisConfig;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The analysis that was written, for callers that want to inspect it
///
/// # Errors
/// * Config file or entry source failures
/// * Requested trace key not present in the input
/// * File write errors
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<TraceAnalysis> {
    let start_time = Instant::now();

    let config = match &args.config_path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    // Step 1: Load entries
    info!("Step 1/4: Loading entries...");
    let source = open_source(args)?;
    let entries = source
        .load()
        .with_context(|| format!("Failed to load entries from {}", source.describe()))?;

    // Step 2: Pick the trace
    info!("Step 2/4: Resolving correlation...");
    let entries = select_trace(&entries, args.trace.as_deref(), &config)?;

    // Step 3: Analyze
    info!("Step 3/4: Building span forest for {} entries...", entries.len());
    let analysis = analyze_trace(&entries, &config);

    debug!("Critical path: {}", analysis.critical_path.join(" -> "));

    // Step 4: Write outputs
    info!("Step 4/4: Writing report...");
    let report = analysis.to_report();
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;

    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("TRACE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("{}", generate_text_summary(&analysis, config.summary_rows));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(analysis)
}

/// Build the entry source named by the arguments
///
/// **Private** - internal helper for execute_analyze
fn open_source(args: &AnalyzeArgs) -> Result<Box<dyn EntrySource>> {
    match (&args.input, &args.url) {
        (Some(path), None) => Ok(Box::new(FileSource::new(path))),
        (None, Some(url)) => Ok(Box::new(
            HttpSource::new(url.as_str()).context("Failed to create HTTP source")?,
        )),
        _ => anyhow::bail!("Exactly one of --input or --url is required"),
    }
}

/// Narrow a mixed entry set down to one trace
///
/// **Public** - usable without going through the CLI
///
/// With `trace_key`, the group carrying that key (under the resolved
/// correlation kind) is returned, or an error if there is none. Without it
/// the whole set is returned, warning when it spans several traces.
pub fn select_trace(
    entries: &[LogEntry],
    trace_key: Option<&str>,
    config: &AnalysisConfig,
) -> Result<Vec<LogEntry>> {
    let kind = resolve_correlation(entries, &config.correlation);
    info!("Correlating entries by {}", kind);

    let groups = partition_by_correlation(entries, kind);

    match trace_key {
        Some(key) => groups
            .into_iter()
            .find(|(group_key, _)| group_key == key)
            .map(|(_, group)| group)
            .with_context(|| format!("No entries with {} = {}", kind, key)),
        None => {
            // Several threads are normal inside one trace; several trace or
            // rpc ids are not
            let keyed = groups.iter().filter(|(key, _)| !key.is_empty()).count();
            if kind != CorrelationKind::ThreadId && keyed > 1 {
                warn!(
                    "Input holds {} distinct {} values, analyzing them as one trace (use --trace to pick one)",
                    keyed, kind
                );
            }
            Ok(entries.to_vec())
        }
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    match (&args.input, &args.url) {
        (None, None) => anyhow::bail!("One of --input or --url is required"),
        (Some(_), Some(_)) => anyhow::bail!("--input and --url cannot be used together"),
        _ => {}
    }

    if let Some(url) = &args.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("URL must start with http:// or https://");
        }
    }

    if let Some(path) = &args.input {
        if path.as_os_str().is_empty() {
            anyhow::bail!("Input path cannot be empty");
        }
    }

    if args.trace.as_deref().is_some_and(|t| t.trim().is_empty()) {
        anyhow::bail!("Trace key cannot be empty");
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogType;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn entry(id: &str, trace: &str) -> LogEntry {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        LogEntry::new(id, ts, LogType::Sql, 1, "T1").with_trace_id(trace)
    }

    #[test]
    fn test_validate_args_valid() {
        let args = AnalyzeArgs {
            input: Some(PathBuf::from("entries.json")),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_needs_a_source() {
        assert!(validate_args(&AnalyzeArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_rejects_both_sources() {
        let args = AnalyzeArgs {
            input: Some(PathBuf::from("entries.json")),
            url: Some("http://localhost:8080".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_url_scheme() {
        let args = AnalyzeArgs {
            url: Some("ftp://localhost".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_blank_trace() {
        let args = AnalyzeArgs {
            input: Some(PathBuf::from("entries.json")),
            trace: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_select_trace_by_key() {
        let entries = vec![entry("1", "a"), entry("2", "b"), entry("3", "a")];
        let picked = select_trace(&entries, Some("a"), &AnalysisConfig::default()).unwrap();

        let ids: Vec<&str> = picked.iter().map(|e| e.entry_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_select_trace_unknown_key() {
        let entries = vec![entry("1", "a")];
        assert!(select_trace(&entries, Some("zzz"), &AnalysisConfig::default()).is_err());
    }

    #[test]
    fn test_select_trace_without_key_keeps_everything() {
        let entries = vec![entry("1", "a"), entry("2", "b")];
        let picked = select_trace(&entries, None, &AnalysisConfig::default()).unwrap();
        assert_eq!(picked.len(), 2);
    }
}
