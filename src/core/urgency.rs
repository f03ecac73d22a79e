use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

use super::marker::{Priority, Transition};
use super::todo::TodoItem;

/// Deadlines at least this many days out count as "later".
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Colour bucket used to underline an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Red,
    Orange,
    Green,
    Blue,
}

impl Highlight {
    pub fn for_item(item: &TodoItem, now: NaiveDateTime, upcoming_days: i64) -> Self {
        let priority = item.priority();
        if item.has_deadline() {
            let days = item.days_diff_at(now);
            if days < 0 {
                Self::Red
            } else if days >= upcoming_days {
                Self::Blue
            } else if item.is_in_progress() {
                Self::Green
            } else {
                Self::Orange
            }
        } else if item.is_in_progress() {
            if priority.is_urgent() {
                Self::Orange
            } else {
                Self::Green
            }
        } else if item.is_blocked() {
            if priority.is_urgent() {
                Self::Red
            } else {
                Self::Orange
            }
        } else {
            match priority {
                Priority::Critical => Self::Red,
                Priority::High => Self::Orange,
                _ => Self::Blue,
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an item is grouped in a document outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineKind {
    /// Overdue, or urgent without a deadline.
    Alert,
    /// Due within the upcoming window.
    Soon,
    Later,
}

impl OutlineKind {
    pub fn for_item(item: &TodoItem, now: NaiveDateTime, upcoming_days: i64) -> Self {
        if item.has_deadline() {
            let days = item.days_diff_at(now);
            if days < 0 {
                Self::Alert
            } else if days >= upcoming_days {
                Self::Later
            } else {
                Self::Soon
            }
        } else if item.priority().is_urgent() {
            Self::Alert
        } else {
            Self::Later
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Soon => "soon",
            Self::Later => "later",
        }
    }
}

impl fmt::Display for OutlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quick fixes offered for an item, in display order.
pub fn available_actions(item: &TodoItem) -> Vec<Transition> {
    let mut actions = vec![Transition::Done];
    if !item.is_in_progress() {
        actions.push(Transition::InProgress);
    }
    if item.is_in_progress() {
        actions.push(Transition::Blocked);
    }
    if item.priority() != Priority::Critical {
        actions.push(Transition::IncreasePriority);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parser::parse_line;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn highlight(line: &str) -> Highlight {
        Highlight::for_item(&parse_line(line).unwrap(), now(), DEFAULT_UPCOMING_DAYS)
    }

    fn kind(line: &str) -> OutlineKind {
        OutlineKind::for_item(&parse_line(line).unwrap(), now(), DEFAULT_UPCOMING_DAYS)
    }

    #[test]
    fn deadline_drives_highlight() {
        assert_eq!(highlight("TODO: <10/10> overdue"), Highlight::Red);
        assert_eq!(highlight("TODO: <30/10> far off"), Highlight::Blue);
        assert_eq!(highlight("TODO: <18/10> soon"), Highlight::Orange);
        assert_eq!(highlight("WIP: <18/10> soon"), Highlight::Green);
    }

    #[test]
    fn undated_items_follow_status_and_priority() {
        assert_eq!(highlight("\u{1F525} hot"), Highlight::Orange);
        assert_eq!(highlight("\u{23F3} steady"), Highlight::Green);
        assert_eq!(highlight("\u{26A0}\u{FE0F} stuck"), Highlight::Red);
        assert_eq!(highlight("\u{2753} unsure"), Highlight::Orange);
        assert_eq!(highlight("\u{203C}\u{FE0F} now"), Highlight::Red);
        assert_eq!(highlight("\u{2757} soon"), Highlight::Orange);
        assert_eq!(highlight("[ ] whenever"), Highlight::Blue);
    }

    #[test]
    fn outline_kinds() {
        assert_eq!(kind("TODO: <10/10> overdue"), OutlineKind::Alert);
        assert_eq!(kind("TODO: <19/10> this week"), OutlineKind::Soon);
        assert_eq!(kind("TODO: <23/10> next week"), OutlineKind::Later);
        assert_eq!(kind("\u{2757} urgent"), OutlineKind::Alert);
        assert_eq!(kind("[ ] backlog"), OutlineKind::Later);
    }

    #[test]
    fn quick_fixes_depend_on_state() {
        let open = parse_line("TODO: a").unwrap();
        assert_eq!(
            available_actions(&open),
            vec![Transition::Done, Transition::InProgress, Transition::IncreasePriority]
        );

        let wip = parse_line("WIP: a").unwrap();
        assert_eq!(
            available_actions(&wip),
            vec![Transition::Done, Transition::Blocked, Transition::IncreasePriority]
        );

        let critical = parse_line("\u{1F525} a").unwrap();
        assert_eq!(
            available_actions(&critical),
            vec![Transition::Done, Transition::Blocked]
        );
    }
}
