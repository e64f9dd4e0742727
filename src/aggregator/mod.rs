//! Span tree construction, critical path and aggregate statistics.
//!
//! This module transforms correlated log entries into:
//! - A forest of causal span trees (hierarchy)
//! - The dominant path explaining total duration (critical_path)
//! - Flat views and trace-level aggregates (stats)

pub mod critical_path;
pub mod hierarchy;
pub mod stats;

// Re-export main types and functions
pub use critical_path::{
    compute_critical_path, compute_critical_path_contribution, mark_critical_path,
};
pub use hierarchy::build_span_forest;
pub use stats::{
    compute_span_stats, compute_type_breakdown, count_errors, find_primary_queue,
    find_primary_user, flatten_spans, SpanStats,
};
