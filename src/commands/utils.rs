use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Correlation: {}", report.correlation);
    println!("  Spans: {}", report.summary.span_count);
    println!("  Total Time: {} ms", report.summary.total_duration_ms);
    println!("  Errors: {}", report.summary.error_count);
    println!("  Critical Path: {} spans", report.critical_path.len());

    if report.version != SCHEMA_VERSION {
        println!(
            "  ! Schema version {} differs from current {}",
            report.version, SCHEMA_VERSION
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("AR Trace Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string              - Schema version (e.g., '1.0.0')");
        println!("  correlation: string          - trace_id | rpc_id | thread_id");
        println!("  summary: object              - Trace-level aggregates");
        println!("    span_count: number         - Spans in the forest");
        println!("    root_count: number         - Root spans");
        println!("    trace_start: string?       - First entry timestamp");
        println!("    total_duration_ms: number  - Trace start to latest span end");
        println!("    error_count: number        - Failed spans or spans with a message");
        println!("    primary_user: string?      - Most frequent user");
        println!("    primary_queue: string?     - Most frequent queue");
        println!("    type_breakdown: object     - Span count per log type");
        println!("  critical_path: array         - Span ids, one path per root");
        println!("  spans: array                 - Spans in pre-order");
        println!("    id, parent_id?, log_type, start_offset_ms, duration_ms, depth");
        println!("    on_critical_path, contribution_pct, success, error_message?");
        println!("    user, queue");
        println!("  generated_at: string         - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("AR Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Span-tree reconstruction and critical-path analysis for rule engine logs.");
}
