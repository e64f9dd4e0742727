//! Flat views and aggregate statistics over a span forest.
//!
//! Everything here is a pure function of its input and can be called
//! repeatedly on the same forest.

use crate::model::{LogType, SpanForest, SpanNode};
use std::collections::{BTreeMap, HashMap};

/// Flatten the forest in pre-order
///
/// A root, then its whole subtree, then the next root: the top-to-bottom
/// order of a waterfall view.
pub fn flatten_spans(forest: &SpanForest) -> Vec<&SpanNode> {
    forest.iter().collect()
}

/// Count spans per log type
///
/// Only types that actually occur appear in the map.
pub fn compute_type_breakdown(spans: &[&SpanNode]) -> BTreeMap<LogType, usize> {
    let mut breakdown = BTreeMap::new();
    for span in spans {
        *breakdown.entry(span.log_type).or_insert(0) += 1;
    }
    breakdown
}

/// Count spans that failed or carry an error message
pub fn count_errors(spans: &[&SpanNode]) -> usize {
    spans.iter().filter(|span| span.is_error()).count()
}

/// Most frequent non-empty user
pub fn find_primary_user(spans: &[&SpanNode]) -> Option<String> {
    most_frequent(spans.iter().map(|span| span.user.as_str()))
}

/// Most frequent non-empty queue
pub fn find_primary_queue(spans: &[&SpanNode]) -> Option<String> {
    most_frequent(spans.iter().map(|span| span.queue.as_str()))
}

/// Most frequent non-empty value; ties go to the value seen first
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    // value -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, value) in values.enumerate() {
        if value.is_empty() {
            continue;
        }
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value.to_string())
}

/// Aggregate statistics for one trace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanStats {
    pub span_count: usize,
    pub error_count: usize,
    pub type_breakdown: BTreeMap<LogType, usize>,
    pub primary_user: Option<String>,
    pub primary_queue: Option<String>,
}

impl SpanStats {
    /// Human-readable one-liner for logging
    pub fn summary(&self) -> String {
        let types: Vec<String> = self
            .type_breakdown
            .iter()
            .map(|(ty, count)| format!("{}={}", ty, count))
            .collect();

        format!(
            "Spans: {} | Errors: {} | Types: [{}] | User: {} | Queue: {}",
            self.span_count,
            self.error_count,
            types.join(", "),
            self.primary_user.as_deref().unwrap_or("-"),
            self.primary_queue.as_deref().unwrap_or("-")
        )
    }
}

/// Compute all aggregates over flattened spans in one call
pub fn compute_span_stats(spans: &[&SpanNode]) -> SpanStats {
    SpanStats {
        span_count: spans.len(),
        error_count: count_errors(spans),
        type_breakdown: compute_type_breakdown(spans),
        primary_user: find_primary_user(spans),
        primary_queue: find_primary_queue(spans),
    }
}
