//! Plain-text trace summary for terminal output.

use crate::analysis::TraceAnalysis;

const NAME_WIDTH: usize = 40;

/// Render a compact summary: headline numbers, then spans in pre-order
///
/// Critical path spans are marked with `*`; nesting is shown by indentation.
/// At most `max_rows` spans are listed.
pub fn generate_text_summary(analysis: &TraceAnalysis, max_rows: usize) -> String {
    let mut lines = Vec::new();
    let stats = &analysis.stats;

    lines.push(format!("Correlation:   {}", analysis.correlation));
    lines.push(format!("Total Time:    {} ms", analysis.total_duration_ms));
    lines.push(format!(
        "Spans:         {} ({} roots)",
        stats.span_count,
        analysis.forest.roots.len()
    ));
    lines.push(format!("Errors:        {}", stats.error_count));
    lines.push(format!(
        "Primary User:  {}",
        stats.primary_user.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "Primary Queue: {}",
        stats.primary_queue.as_deref().unwrap_or("-")
    ));

    let types: Vec<String> = stats
        .type_breakdown
        .iter()
        .map(|(ty, count)| format!("{} {}", ty, count))
        .collect();
    lines.push(format!("Types:         {}", types.join(", ")));

    if analysis.forest.is_empty() {
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(format!(
        "  {:<width$} {:>10} {:>10} {:>7}",
        "SPAN",
        "START ms",
        "DUR ms",
        "%",
        width = NAME_WIDTH
    ));
    lines.push(format!("  {}", "-".repeat(NAME_WIDTH + 30)));

    for node in analysis.forest.iter().take(max_rows) {
        let marker = if node.on_critical_path { '*' } else { ' ' };
        let label = format!(
            "{}{}{} {}",
            "  ".repeat(node.depth),
            marker,
            node.log_type,
            node.id
        );
        let label = truncate_label(&label, NAME_WIDTH);
        let error = if node.is_error() { "  !" } else { "" };

        lines.push(format!(
            "  {:<width$} {:>10} {:>10} {:>6.1}%{}",
            label,
            node.start_offset_ms,
            node.duration_ms,
            analysis.contribution(node),
            error,
            width = NAME_WIDTH
        ));
    }

    let remaining = stats.span_count.saturating_sub(max_rows);
    if remaining > 0 {
        lines.push(format!("  ... {} more spans", remaining));
    }

    lines.join("\n")
}

/// Keep the tail of over-long labels
fn truncate_label(label: &str, width: usize) -> String {
    let count = label.chars().count();
    if count <= width {
        return label.to_string();
    }
    let tail: String = label.chars().skip(count - (width - 3)).collect();
    format!("...{}", tail)
}
