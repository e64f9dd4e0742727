//! End-to-end analysis of one trace.
//!
//! Data flows one way: entries -> correlation -> hierarchy -> critical path
//! and stats. Each call builds and owns a private forest, so independent
//! traces can be analyzed concurrently and re-running is idempotent.

use crate::aggregator::{
    build_span_forest, compute_critical_path, compute_critical_path_contribution,
    compute_span_stats, flatten_spans, SpanStats,
};
use crate::correlate::{resolve_correlation, CorrelationKind};
use crate::model::{LogEntry, SpanForest, SpanNode, SpanRow, TraceReport, TraceSummary};
use crate::utils::config::{AnalysisConfig, SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use log::debug;

/// Everything derived from one trace's entries
#[derive(Debug, Clone)]
pub struct TraceAnalysis {
    /// Identifier kind the entries were grouped by
    pub correlation: CorrelationKind,

    /// Timestamp all offsets are relative to
    pub trace_start: Option<DateTime<Utc>>,

    /// Span trees, critical path already flagged
    pub forest: SpanForest,

    /// Critical path span ids in forest order
    pub critical_path: Vec<String>,

    pub stats: SpanStats,

    pub total_duration_ms: u64,
}

/// Analyze the entries of one trace
///
/// **Public** - main entry point for the analysis pipeline
///
/// # Arguments
/// * `entries` - Entries scoped to one correlation key, ascending by timestamp
/// * `config` - Correlation rules and related settings
///
/// # Returns
/// The annotated forest plus aggregates. Empty input gives an empty forest
/// and zeroed aggregates; there is no failure case.
pub fn analyze_trace(entries: &[LogEntry], config: &AnalysisConfig) -> TraceAnalysis {
    debug!("Analyzing trace with {} entries", entries.len());

    let correlation = resolve_correlation(entries, &config.correlation);
    let trace_start = entries.iter().map(|e| e.timestamp).min();

    let mut forest = build_span_forest(entries);
    let critical_path = compute_critical_path(&mut forest);

    let stats = compute_span_stats(&flatten_spans(&forest));
    let total_duration_ms = forest.total_duration_ms();

    debug!("Trace stats: {}", stats.summary());

    TraceAnalysis {
        correlation,
        trace_start,
        forest,
        critical_path,
        stats,
        total_duration_ms,
    }
}

impl TraceAnalysis {
    /// Share of the total trace duration taken by `node`
    pub fn contribution(&self, node: &SpanNode) -> f64 {
        compute_critical_path_contribution(node, self.total_duration_ms)
    }

    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            span_count: self.stats.span_count,
            root_count: self.forest.roots.len(),
            trace_start: self.trace_start,
            total_duration_ms: self.total_duration_ms,
            error_count: self.stats.error_count,
            primary_user: self.stats.primary_user.clone(),
            primary_queue: self.stats.primary_queue.clone(),
            type_breakdown: self.stats.type_breakdown.clone(),
        }
    }

    /// Flat pre-order rows with contribution percentages
    pub fn rows(&self) -> Vec<SpanRow> {
        flatten_spans(&self.forest)
            .into_iter()
            .map(|node| SpanRow {
                id: node.id.clone(),
                parent_id: node.parent_id.clone(),
                log_type: node.log_type,
                start_offset_ms: node.start_offset_ms,
                duration_ms: node.duration_ms,
                depth: node.depth,
                on_critical_path: node.on_critical_path,
                contribution_pct: self.contribution(node),
                success: node.success,
                error_message: node.error_message.clone(),
                user: node.user.clone(),
                queue: node.queue.clone(),
            })
            .collect()
    }

    /// Convert to the versioned report document
    pub fn to_report(&self) -> TraceReport {
        TraceReport {
            version: SCHEMA_VERSION.to_string(),
            correlation: self.correlation,
            summary: self.summary(),
            critical_path: self.critical_path.clone(),
            spans: self.rows(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogType;
    use chrono::{Duration, TimeZone};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_empty_analysis() {
        let analysis = analyze_trace(&[], &AnalysisConfig::default());

        assert!(analysis.forest.is_empty());
        assert!(analysis.critical_path.is_empty());
        assert_eq!(analysis.total_duration_ms, 0);
        assert_eq!(analysis.correlation, CorrelationKind::ThreadId);
        assert!(analysis.trace_start.is_none());
        assert_eq!(analysis.stats, SpanStats::default());
    }

    #[test]
    fn test_report_rows() {
        let entries = vec![
            LogEntry::new("api", at(0), LogType::Api, 200, "T1").with_trace_id("t"),
            LogEntry::new("sql", at(50), LogType::Sql, 50, "T1").with_trace_id("t"),
        ];

        let report = analyze_trace(&entries, &AnalysisConfig::default()).to_report();

        assert_eq!(report.version, SCHEMA_VERSION);
        assert_eq!(report.correlation, CorrelationKind::TraceId);
        assert_eq!(report.critical_path, vec!["api", "sql"]);
        assert_eq!(report.summary.total_duration_ms, 200);
        assert_eq!(report.summary.root_count, 1);
        assert_eq!(report.spans.len(), 2);
        assert_eq!(report.spans[0].contribution_pct, 100.0);
        assert_eq!(report.spans[1].contribution_pct, 25.0);
        assert_eq!(report.spans[1].parent_id.as_deref(), Some("api"));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let entries = vec![
            LogEntry::new("a", at(0), LogType::Api, 100, "T1"),
            LogEntry::new("b", at(10), LogType::Filter, 5, "T1").with_filter_level(1),
        ];
        let config = AnalysisConfig::default();

        let first = analyze_trace(&entries, &config);
        let second = analyze_trace(&entries, &config);
        assert_eq!(first.forest, second.forest);
        assert_eq!(first.critical_path, second.critical_path);
    }
}
