use regex::{CaptureMatches, Captures, Regex};
use std::cmp::Reverse;
use std::sync::LazyLock;

use crate::core::marker::Marker;
use crate::core::todo::TodoItem;

/// Glyph marking a soft-wrapped continuation; item text stops before it.
pub const CONTINUATION_GLYPH: char = '\u{21AA}';

static TODO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&pattern_source()).unwrap());

/// Build the marker pattern from the vocabulary.
///
/// Open markers only, longest token first, then an optional `<info>` tag and
/// the item text up to `.`, `;`, the continuation glyph or the line end.
fn pattern_source() -> String {
    let mut tokens: Vec<&'static str> = Marker::ALL
        .iter()
        .filter(|m| m.is_active())
        .map(|m| m.token())
        .collect();
    tokens.sort_by_key(|t| Reverse(t.len()));
    let alternation = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    format!(
        r"(?P<prefix>{})(?:[ \t]*<(?P<info>[^>\r\n]+)>)?[ \t]*(?P<text>[^.;\r\n{}]*)",
        alternation, CONTINUATION_GLYPH
    )
}

/// Source of the marker pattern, for handing to a workspace search.
pub fn search_pattern() -> &'static str {
    TODO_RE.as_str()
}

/// Lazy sequence of items in a text. Each call to [`parse_all`] starts a
/// fresh scan; the cursor belongs to the iterator.
pub struct TodoMatches<'t> {
    inner: CaptureMatches<'static, 't>,
}

impl Iterator for TodoMatches<'_> {
    type Item = TodoItem;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.inner.next()?;
        Some(item_from_captures(&caps))
    }
}

fn item_from_captures(caps: &Captures) -> TodoItem {
    let whole = caps.get_match();
    let info = caps.name("info").map(|m| m.as_str().to_string());
    let text = caps.name("text").map_or("", |m| m.as_str()).trim_end();
    TodoItem::new(whole.as_str(), &caps["prefix"], info, text).with_span(whole.range())
}

pub fn parse_all(text: &str) -> TodoMatches<'_> {
    TodoMatches {
        inner: TODO_RE.captures_iter(text),
    }
}

/// First item on a line, if any.
pub fn parse_line(line: &str) -> Option<TodoItem> {
    parse_all(line).next()
}
