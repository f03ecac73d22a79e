use chrono::{Datelike, NaiveDateTime};
use std::ops::Range;

use super::marker::{Marker, Priority};
use super::schedule;

/// A single TODO marker found in a line of markdown.
///
/// Only the matched pieces are stored; everything else is derived on each
/// call so a changed prefix or tag is never out of sync with its meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub full_match: String,
    pub todo_prefix: String,
    pub info: Option<String>,
    pub text: String,
    /// Byte range of `full_match` in the scanned text.
    pub span: Range<usize>,
}

impl TodoItem {
    /// Build an item from match parts. No validation: an unknown prefix
    /// classifies as a plain low-priority item.
    pub fn new(
        full_match: impl Into<String>,
        todo_prefix: impl Into<String>,
        info: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        let full_match = full_match.into();
        let span = 0..full_match.len();
        Self {
            full_match,
            todo_prefix: todo_prefix.into(),
            info,
            text: text.into(),
            span,
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = span;
        self
    }

    pub fn marker(&self) -> Option<Marker> {
        Marker::from_token(&self.todo_prefix)
    }

    pub fn priority(&self) -> Priority {
        self.marker().map(|m| m.priority()).unwrap_or(Priority::Low)
    }

    pub fn is_in_progress(&self) -> bool {
        self.marker().is_some_and(|m| m.is_in_progress())
    }

    pub fn is_blocked(&self) -> bool {
        self.marker().is_some_and(|m| m.is_blocked())
    }

    pub fn has_deadline(&self) -> bool {
        self.info.as_deref().is_some_and(schedule::is_deadline_syntax)
    }

    /// The parsed deadline, or `None` when the tag is absent or not date
    /// syntax. A tag that looks like a date but does not parse yields the
    /// epoch sentinel.
    pub fn deadline_at(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.has_deadline() {
            return None;
        }
        self.info
            .as_deref()
            .map(|info| schedule::parse_deadline_at(info, now))
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.deadline_at(schedule::now())
    }

    /// Days until the deadline; items without one compare against the epoch
    /// sentinel and come out far in the past.
    pub fn days_diff_at(&self, now: NaiveDateTime) -> i64 {
        let date = schedule::parse_deadline_at(self.info.as_deref().unwrap_or_default(), now);
        schedule::days_diff_from(date, now)
    }

    pub fn days_diff(&self) -> i64 {
        self.days_diff_at(schedule::now())
    }

    pub fn details_at(&self, now: NaiveDateTime) -> String {
        let Some(date) = self.deadline_at(now) else {
            return "anytime".to_string();
        };
        let diff = schedule::days_diff_from(date, now);
        let when = match diff {
            0 => "today".to_string(),
            d if d > 0 => format!("in {} day(s)", d),
            d => format!("{} day(s) ago", -d),
        };
        format!("{}/{} - {}", date.day(), date.month(), when)
    }

    pub fn details(&self) -> String {
        self.details_at(schedule::now())
    }

    /// Text shown when hovering the item: `text<details>`.
    pub fn hover_text_at(&self, now: NaiveDateTime) -> String {
        format!("{}<{}>", self.text, self.details_at(now))
    }

    /// Byte offset of `text` inside `full_match`.
    pub fn text_index_in_match(&self) -> usize {
        self.full_match.find(&self.text).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parser::parse_line;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn bracket_item_with_date_tag() {
        let item = parse_line("[ ] <03/25> write report").unwrap();
        assert!(item.has_deadline());
        assert_eq!(item.text, "write report");
        assert_eq!(item.info.as_deref(), Some("03/25"));
        assert_eq!(item.priority(), Priority::Low);
    }

    #[test]
    fn deadline_today_reads_today() {
        let item = parse_line("TODO: <16/10> call the bank").unwrap();
        assert_eq!(item.days_diff_at(now()), 0);
        assert_eq!(item.details_at(now()), "16/10 - today");
    }

    #[test]
    fn details_count_days() {
        let soon = parse_line("TODO: <19/10> renew").unwrap();
        assert_eq!(soon.details_at(now()), "19/10 - in 3 day(s)");
        let late = parse_line("TODO: <CW42.1> renew").unwrap();
        assert_eq!(late.details_at(now()), "12/10 - 4 day(s) ago");
    }

    #[test]
    fn non_date_tag_means_anytime() {
        let item = parse_line("TODO: <not-a-date> tidy desk").unwrap();
        assert!(!item.has_deadline());
        assert_eq!(item.deadline_at(now()), None);
        assert_eq!(item.details_at(now()), "anytime");
        assert_eq!(item.hover_text_at(now()), "tidy desk<anytime>");
    }

    #[test]
    fn missing_tag_is_far_in_the_past() {
        let item = parse_line("[ ] water plants").unwrap();
        assert!(!item.has_deadline());
        assert!(item.days_diff_at(now()) < -20000);
    }

    #[test]
    fn unknown_prefix_defaults_to_low() {
        let item = TodoItem::new("NOTE: x", "NOTE:", None, "x");
        assert_eq!(item.priority(), Priority::Low);
        assert!(!item.is_in_progress());
        assert!(!item.is_blocked());
        assert_eq!(item.marker(), None);
    }

    #[test]
    fn classification_follows_marker() {
        let wip = parse_line("WIP: draft").unwrap();
        assert!(wip.is_in_progress());
        assert!(!wip.is_blocked());
        assert_eq!(wip.priority(), Priority::Normal);

        let blocked = parse_line("\u{1F6A9} waiting on legal").unwrap();
        assert!(blocked.is_blocked());
        assert_eq!(blocked.priority(), Priority::Critical);
    }

    #[test]
    fn text_offset_inside_match() {
        let item = parse_line("- [-] <CW5> tidy").unwrap();
        assert_eq!(item.full_match, "[-] <CW5> tidy");
        assert_eq!(item.text_index_in_match(), 10);
    }
}
