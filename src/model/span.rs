//! Span tree types produced by the hierarchy builder.
//!
//! Each `SpanNode` owns its children in arrival order. There are no
//! back-pointers; `parent_id` is carried as plain data for consumers that
//! want a flat list with parent references.

use super::entry::LogType;
use serde::{Deserialize, Serialize};

/// One log entry placed in the causal tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanNode {
    /// Same as the source entry id
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub log_type: LogType,

    /// Offset from the first entry of the trace
    pub start_offset_ms: i64,

    pub duration_ms: u64,

    /// Distance from the nearest root (roots are 0)
    pub depth: usize,

    /// Child spans in arrival order
    #[serde(default)]
    pub children: Vec<SpanNode>,

    #[serde(default)]
    pub on_critical_path: bool,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub queue: String,
}

impl SpanNode {
    /// End of this span relative to the trace start
    pub fn end_offset_ms(&self) -> i64 {
        self.start_offset_ms
            .saturating_add(i64::try_from(self.duration_ms).unwrap_or(i64::MAX))
    }

    /// Failed, or carries a diagnostic message
    pub fn is_error(&self) -> bool {
        !self.success
            || self
                .error_message
                .as_deref()
                .is_some_and(|msg| !msg.is_empty())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Ordered collection of span trees for one trace
///
/// Roots from concurrent threads are siblings here, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanForest {
    pub roots: Vec<SpanNode>,
}

impl SpanForest {
    pub fn new(roots: Vec<SpanNode>) -> Self {
        Self { roots }
    }

    /// Total number of spans across all trees
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order walk: a root, its subtree, then the next root
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Look up a span anywhere in the forest
    pub fn find(&self, id: &str) -> Option<&SpanNode> {
        self.iter().find(|node| node.id == id)
    }

    /// Elapsed time from the trace start to the latest span end
    pub fn total_duration_ms(&self) -> u64 {
        self.iter()
            .map(SpanNode::end_offset_ms)
            .max()
            .unwrap_or(0)
            .max(0) as u64
    }
}

/// Pre-order iterator over a `SpanForest`
pub struct PreOrder<'a> {
    stack: Vec<&'a SpanNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a SpanNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, start: i64, duration: u64, children: Vec<SpanNode>) -> SpanNode {
        SpanNode {
            id: id.to_string(),
            parent_id: None,
            log_type: LogType::Api,
            start_offset_ms: start,
            duration_ms: duration,
            depth: 0,
            children,
            on_critical_path: false,
            success: true,
            error_message: None,
            user: String::new(),
            queue: String::new(),
        }
    }

    #[test]
    fn test_pre_order_walk() {
        let forest = SpanForest::new(vec![
            node(
                "a",
                0,
                50,
                vec![
                    node("b", 5, 10, vec![node("c", 6, 2, vec![])]),
                    node("d", 20, 5, vec![]),
                ],
            ),
            node("e", 60, 10, vec![]),
        ]);

        let ids: Vec<&str> = forest.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(forest.len(), 5);
        assert_eq!(forest.total_duration_ms(), 70);
        assert_eq!(forest.find("c").map(|n| n.start_offset_ms), Some(6));
        assert!(forest.find("zzz").is_none());
    }

    #[test]
    fn test_empty_forest() {
        let forest = SpanForest::default();
        assert!(forest.is_empty());
        assert_eq!(forest.len(), 0);
        assert_eq!(forest.total_duration_ms(), 0);
    }

    #[test]
    fn test_end_offset_saturates() {
        let span = node("a", 10, u64::MAX, vec![]);
        assert_eq!(span.end_offset_ms(), i64::MAX);
        assert_eq!(SpanForest::new(vec![span]).total_duration_ms(), i64::MAX as u64);
    }

    #[test]
    fn test_is_error() {
        let mut span = node("a", 0, 1, vec![]);
        assert!(!span.is_error());

        span.error_message = Some(String::new());
        assert!(!span.is_error());

        span.error_message = Some("ARERR 302".to_string());
        assert!(span.is_error());

        span.error_message = None;
        span.success = false;
        assert!(span.is_error());
    }
}
