//! Correlation key resolution.
//!
//! One key type is chosen for a whole entry set: the first kind in the
//! precedence list that any entry actually carries. Thread id is always the
//! last resort, so resolution cannot fail.

use crate::model::LogEntry;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier used to group entries into one trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationKind {
    TraceId,
    RpcId,
    ThreadId,
}

impl CorrelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationKind::TraceId => "trace_id",
            CorrelationKind::RpcId => "rpc_id",
            CorrelationKind::ThreadId => "thread_id",
        }
    }
}

impl fmt::Display for CorrelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation precedence, passed explicitly to the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationRules {
    /// Kinds to try, highest priority first
    pub precedence: Vec<CorrelationKind>,
}

impl Default for CorrelationRules {
    fn default() -> Self {
        Self {
            precedence: vec![
                CorrelationKind::TraceId,
                CorrelationKind::RpcId,
                CorrelationKind::ThreadId,
            ],
        }
    }
}

impl CorrelationRules {
    /// Precedence list with thread id guaranteed as the final fallback
    pub fn effective_precedence(&self) -> Vec<CorrelationKind> {
        let mut order = self.precedence.clone();
        if !order.contains(&CorrelationKind::ThreadId) {
            order.push(CorrelationKind::ThreadId);
        }
        order
    }
}

/// Non-empty key value an entry carries for `kind`
pub fn correlation_key(entry: &LogEntry, kind: CorrelationKind) -> Option<&str> {
    match kind {
        CorrelationKind::TraceId => entry.trace_key(),
        CorrelationKind::RpcId => entry.rpc_key(),
        CorrelationKind::ThreadId => {
            Some(entry.thread_id.as_str()).filter(|t| !t.trim().is_empty())
        }
    }
}

/// Choose the correlation kind for an entry set
///
/// **Public** - main entry point for correlation
///
/// # Arguments
/// * `entries` - Full entry set (scanned once per candidate kind)
/// * `rules` - Precedence to apply
///
/// # Returns
/// The first kind in precedence order that at least one entry carries a
/// non-empty value for; `ThreadId` when nothing else matches
pub fn resolve_correlation(entries: &[LogEntry], rules: &CorrelationRules) -> CorrelationKind {
    let kind = rules
        .effective_precedence()
        .into_iter()
        .find(|kind| {
            *kind == CorrelationKind::ThreadId
                || entries.iter().any(|e| correlation_key(e, *kind).is_some())
        })
        .unwrap_or(CorrelationKind::ThreadId);

    debug!(
        "Resolved correlation over {} entries: {}",
        entries.len(),
        kind
    );

    kind
}

/// Split a mixed entry collection into per-key groups
///
/// Groups come out in first-seen order and keep arrival order inside.
/// Entries without a value for `kind` share the empty key.
pub fn partition_by_correlation(
    entries: &[LogEntry],
    kind: CorrelationKind,
) -> Vec<(String, Vec<LogEntry>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<LogEntry>)> = Vec::new();

    for entry in entries {
        let key = correlation_key(entry, kind).unwrap_or_default().to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(entry.clone());
    }

    debug!("Partitioned {} entries into {} groups by {}", entries.len(), groups.len(), kind);

    groups
}
