//! Output JSON schema definitions for trace reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use super::entry::LogType;
use crate::correlate::CorrelationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Identifier kind used to group the entries
    pub correlation: CorrelationKind,

    /// Aggregate numbers for the whole trace
    pub summary: TraceSummary,

    /// Span ids on the critical path, one path per root in forest order
    pub critical_path: Vec<String>,

    /// Every span in pre-order (waterfall reading order)
    pub spans: Vec<SpanRow>,

    /// Timestamp when report was generated
    pub generated_at: String,
}

/// Aggregate statistics for one trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub span_count: usize,

    pub root_count: usize,

    /// First entry timestamp, absent for an empty trace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_start: Option<DateTime<Utc>>,

    pub total_duration_ms: u64,

    pub error_count: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_queue: Option<String>,

    /// Occurrences per log type
    pub type_breakdown: BTreeMap<LogType, usize>,
}

/// One span flattened for tabular consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanRow {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub log_type: LogType,

    pub start_offset_ms: i64,

    pub duration_ms: u64,

    pub depth: usize,

    pub on_critical_path: bool,

    /// Share of the total trace duration
    pub contribution_pct: f64,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub queue: String,
}
