//! Data model: input log entries, derived spans and the report schema.
//!
//! This module defines:
//! - `LogEntry`, the read-only record handed in by the ingestion side
//! - `SpanNode` / `SpanForest`, the causal tree built from those entries
//! - The versioned JSON report written to disk

pub mod entry;
pub mod schema;
pub mod span;

// Re-export main types
pub use entry::{LogEntry, LogType};
pub use schema::{SpanRow, TraceReport, TraceSummary};
pub use span::{SpanForest, SpanNode};
