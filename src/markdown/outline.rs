use chrono::NaiveDateTime;
use serde::Serialize;

use super::parser::parse_all;
use crate::core::marker::Priority;
use crate::core::urgency::{Highlight, OutlineKind};

/// One item of a document outline, positioned by line and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, in characters, of the marker.
    pub column: usize,
    pub marker: String,
    pub name: String,
    pub detail: String,
    pub kind: OutlineKind,
    pub highlight: Highlight,
    pub priority: Priority,
    pub in_progress: bool,
    pub blocked: bool,
}

/// Every open item in `text`, in document order. Several items on one line
/// each get their own entry.
pub fn outline(text: &str, now: NaiveDateTime, upcoming_days: i64) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        for item in parse_all(line) {
            let column = line[..item.span.start].chars().count() + 1;
            entries.push(OutlineEntry {
                line: index + 1,
                column,
                marker: item.todo_prefix.clone(),
                name: item.text.clone(),
                detail: item.details_at(now),
                kind: OutlineKind::for_item(&item, now, upcoming_days),
                highlight: Highlight::for_item(&item, now, upcoming_days),
                priority: item.priority(),
                in_progress: item.is_in_progress(),
                blocked: item.is_blocked(),
            });
        }
    }
    log::debug!("outline: {} item(s) in {} line(s)", entries.len(), text.lines().count());
    entries
}
