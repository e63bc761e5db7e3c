//! Plain-text rendering of the list.

use crate::types::{TodoItem, TodoState};
use std::fmt::Write;

/// Shown instead of rows when the list is empty
pub const EMPTY_MESSAGE: &str = "No tasks yet. Add your first task above to get started!";

/// Render one frame of the list
///
/// Layout, top to bottom: the draft input (with `[add]` only when the
/// draft is submittable), the counts (only for a non-empty list) and one
/// row per item in display order.
#[must_use]
pub fn render(state: &TodoState) -> String {
    let mut out = String::new();

    let _ = write!(out, "New task: {}", state.draft);
    if state.can_submit_draft() {
        out.push_str("  [add]");
    }
    out.push('\n');

    let stats = state.stats();
    if stats.total > 0 {
        let _ = writeln!(
            out,
            "Total: {}  Completed: {}  Pending: {}",
            stats.total, stats.completed, stats.pending
        );
    }

    if state.items.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        out.push('\n');
        return out;
    }

    for item in &state.items {
        render_row(&mut out, item, &state.edit_buffer);
    }
    out
}

fn render_row(out: &mut String, item: &TodoItem, edit_buffer: &str) {
    let mark = if item.completed { 'x' } else { ' ' };
    if item.is_editing {
        let _ = writeln!(out, "[{mark}] #{} editing: {edit_buffer}", item.id);
    } else {
        let _ = writeln!(out, "[{mark}] #{} {}", item.id, item.text);
    }
}
