//! Build the causal span forest from correlated log entries.
//!
//! Entries carry no parent pointers, only timing and (for filters) a nesting
//! level. Nesting is reconstructed per thread with a stack of open ancestor
//! candidates:
//!
//! - Frames close once a later entry starts after their window ends. Leveled
//!   filter frames stay open for a following leveled filter, which is placed
//!   by the level rule instead.
//! - A leveled filter pops the stack until fewer than `filter_level` leveled
//!   filter frames remain, then nests under the new top.
//! - Any other entry nests under the nearest open frame whose window holds
//!   its timestamp and whose type accepts it; frames above that host close.
//! - With no host, the entry starts a new root.
//!
//! Nodes live in an arena while building and are moved into owned trees at
//! the end, so there are no parent/child reference cycles.

use crate::model::{LogEntry, LogType, SpanForest, SpanNode};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;

/// An open ancestor candidate on the builder stack
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Index into the arena
    index: usize,
    log_type: LogType,
    start: i64,
    end: i64,
    /// Filter frame positioned by its level
    leveled: bool,
}

/// Arena of nodes under construction
#[derive(Default)]
struct ForestArena {
    nodes: Vec<SpanNode>,
    children: Vec<Vec<usize>>,
    ids: HashMap<String, usize>,
    roots: Vec<usize>,
}

impl ForestArena {
    fn insert(
        &mut self,
        entry: &LogEntry,
        start: i64,
        parent: Option<usize>,
        depth: usize,
    ) -> usize {
        let index = self.nodes.len();

        if self.ids.insert(entry.entry_id.clone(), index).is_some() {
            warn!("Duplicate entry id {}, keeping both spans", entry.entry_id);
        }

        let parent_id = parent.map(|p| self.nodes[p].id.clone());
        self.nodes.push(SpanNode {
            id: entry.entry_id.clone(),
            parent_id,
            log_type: entry.log_type,
            start_offset_ms: start,
            duration_ms: entry.duration_ms,
            depth,
            children: Vec::new(),
            on_critical_path: false,
            success: entry.success,
            error_message: entry.error_message.clone(),
            user: entry.user.clone(),
            queue: entry.queue.clone(),
        });
        self.children.push(Vec::new());

        match parent {
            Some(p) => self.children[p].push(index),
            None => self.roots.push(index),
        }

        index
    }

    /// Move arena nodes into owned trees
    ///
    /// Children always have a higher index than their parent, so walking the
    /// arena backwards finishes every subtree before its parent is reached.
    fn into_forest(mut self) -> SpanForest {
        let mut done: Vec<Option<SpanNode>> =
            std::iter::repeat_with(|| None).take(self.nodes.len()).collect();

        while let Some(mut node) = self.nodes.pop() {
            let index = self.nodes.len();
            node.children = self.children[index]
                .iter()
                .filter_map(|&child| done[child].take())
                .collect();
            done[index] = Some(node);
        }

        let roots = self
            .roots
            .iter()
            .filter_map(|&root| done[root].take())
            .collect();

        SpanForest::new(roots)
    }
}

/// Build the span forest for one trace
///
/// **Public** - main entry point for hierarchy building
///
/// # Arguments
/// * `entries` - Entries of a single trace, ascending by timestamp
///
/// # Returns
/// Forest whose roots are ordered by each thread's first timestamp.
/// Empty input yields an empty forest.
pub fn build_span_forest(entries: &[LogEntry]) -> SpanForest {
    let Some(trace_start) = entries.iter().map(|e| e.timestamp).min() else {
        return SpanForest::default();
    };

    debug!("Building span forest from {} entries", entries.len());

    let threads = group_by_thread(entries);
    let mut arena = ForestArena::default();

    for (thread_id, group) in &threads {
        build_thread(thread_id, group, trace_start, &mut arena);
    }

    let root_count = arena.roots.len();
    let forest = arena.into_forest();

    debug!(
        "Built {} root spans across {} threads",
        root_count,
        threads.len()
    );

    forest
}

/// Partition entries by thread, ordered by each group's first timestamp
fn group_by_thread(entries: &[LogEntry]) -> Vec<(&str, Vec<&LogEntry>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&LogEntry>)> = Vec::new();

    for entry in entries {
        let thread = entry.thread_id.as_str();
        let slot = *index.entry(thread).or_insert_with(|| {
            groups.push((thread, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(entry);
    }

    // Stable: threads starting together keep first-seen order
    groups.sort_by_key(|(_, group)| group.first().map(|e| e.timestamp));
    groups
}

/// Run the stack discipline over one thread's entries
fn build_thread(
    thread_id: &str,
    group: &[&LogEntry],
    trace_start: DateTime<Utc>,
    arena: &mut ForestArena,
) {
    let mut stack: Vec<Frame> = Vec::new();
    let mut previous_start: Option<i64> = None;
    let mut warned_order = false;

    for entry in group {
        let start = (entry.timestamp - trace_start).num_milliseconds();
        let end = start.saturating_add(i64::try_from(entry.duration_ms).unwrap_or(i64::MAX));

        if previous_start.is_some_and(|prev| start < prev) && !warned_order {
            warn!(
                "Thread {} has out-of-order timestamps (entry {}), nesting is best-effort",
                thread_id, entry.entry_id
            );
            warned_order = true;
        }
        previous_start = Some(start);

        let is_leveled = entry.log_type == LogType::Filter && entry.filter_level.is_some();
        close_expired(&mut stack, start, is_leveled);

        let leveled = match (entry.log_type, entry.filter_level) {
            (LogType::Filter, Some(level)) => {
                // Level 0 is treated as the outermost level
                let level = level.max(1) as usize;
                while let Some(top) = stack.last() {
                    if leveled_count(&stack) < level && hosts_leveled_filter(top.log_type) {
                        break;
                    }
                    stack.pop();
                }
                true
            }
            (log_type, _) => {
                match stack
                    .iter()
                    .rposition(|frame| accepts(frame, log_type, start, end))
                {
                    Some(pos) => stack.truncate(pos + 1),
                    None => stack.clear(),
                }
                false
            }
        };

        let parent = stack.last().map(|frame| frame.index);
        let index = arena.insert(entry, start, parent, stack.len());

        stack.push(Frame {
            index,
            log_type: entry.log_type,
            start,
            end,
            leveled,
        });
    }
}

/// Close the lowest frame that ended before `now`, and everything stacked
/// above it
///
/// With `keep_leveled`, leveled filter frames are skipped: the level rule
/// decides where the incoming filter goes.
fn close_expired(stack: &mut Vec<Frame>, now: i64, keep_leveled: bool) {
    if let Some(pos) = stack
        .iter()
        .position(|frame| !(keep_leveled && frame.leveled) && frame.end < now)
    {
        stack.truncate(pos);
    }
}

fn leveled_count(stack: &[Frame]) -> usize {
    stack.iter().filter(|frame| frame.leveled).count()
}

fn hosts_leveled_filter(host: LogType) -> bool {
    matches!(host, LogType::Api | LogType::Escalation | LogType::Filter)
}

/// Whether `frame` can be the parent of a non-leveled entry
fn accepts(frame: &Frame, child: LogType, start: i64, end: i64) -> bool {
    if start < frame.start || start > frame.end {
        return false;
    }

    match (frame.log_type, child) {
        // An API nests in another API only when strictly inside it
        (LogType::Api, LogType::Api) => {
            start >= frame.start
                && end <= frame.end
                && (start > frame.start || end < frame.end)
        }
        (LogType::Api, _) => true,
        (LogType::Escalation, LogType::Escalation) => false,
        (LogType::Escalation, _) => true,
        (LogType::Filter, LogType::Sql | LogType::Other) => true,
        _ => false,
    }
}
