use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::marker::Marker;
pub use super::marker::Transition;

/// One alternation per transition over every marker that transition rewrites.
///
/// Longer tokens come first so `‼️` is never split. A single `replace_all`
/// pass means a replacement is never matched again within the same call.
struct SubstitutionTable {
    pattern: Option<Regex>,
    pairs: Vec<(&'static str, &'static str)>,
}

impl SubstitutionTable {
    fn build(transition: Transition) -> Self {
        let mut pairs: Vec<(&'static str, &'static str)> = Marker::ALL
            .iter()
            .filter_map(|from| {
                from.target(transition)
                    .filter(|to| to != from)
                    .map(|to| (from.token(), to.token()))
            })
            .collect();
        pairs.sort_by_key(|(from, _)| std::cmp::Reverse(from.len()));

        let pattern = if pairs.is_empty() {
            None
        } else {
            let alternation = pairs
                .iter()
                .map(|(from, _)| regex::escape(from))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation).unwrap())
        };

        Self { pattern, pairs }
    }

    fn apply(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| {
                let found = &caps[0];
                self.pairs
                    .iter()
                    .find(|(from, _)| *from == found)
                    .map(|(_, to)| to.to_string())
                    .unwrap_or_else(|| found.to_string())
            })
            .into_owned()
    }
}

static DONE_TABLE: LazyLock<SubstitutionTable> =
    LazyLock::new(|| SubstitutionTable::build(Transition::Done));
static IN_PROGRESS_TABLE: LazyLock<SubstitutionTable> =
    LazyLock::new(|| SubstitutionTable::build(Transition::InProgress));
static BLOCKED_TABLE: LazyLock<SubstitutionTable> =
    LazyLock::new(|| SubstitutionTable::build(Transition::Blocked));
static PROMOTE_TABLE: LazyLock<SubstitutionTable> =
    LazyLock::new(|| SubstitutionTable::build(Transition::IncreasePriority));

impl Transition {
    pub const ALL: [Transition; 4] = [
        Self::Done,
        Self::InProgress,
        Self::Blocked,
        Self::IncreasePriority,
    ];

    /// Rewrite every marker occurrence in `text`.
    pub fn apply(&self, text: &str) -> String {
        let table: &SubstitutionTable = match self {
            Self::Done => &DONE_TABLE,
            Self::InProgress => &IN_PROGRESS_TABLE,
            Self::Blocked => &BLOCKED_TABLE,
            Self::IncreasePriority => &PROMOTE_TABLE,
        };
        table.apply(text)
    }

    /// Quick-fix title shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::InProgress => "In progress",
            Self::Blocked => "Blocked",
            Self::IncreasePriority => "Increase priority",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

pub fn transform(transition: Transition, text: &str) -> String {
    transition.apply(text)
}

pub fn mark_as_done(text: &str) -> String {
    Transition::Done.apply(text)
}

pub fn mark_as_in_progress(text: &str) -> String {
    Transition::InProgress.apply(text)
}

pub fn mark_as_blocked(text: &str) -> String {
    Transition::Blocked.apply(text)
}

pub fn increase_priority(text: &str) -> String {
    Transition::IncreasePriority.apply(text)
}

/// User-facing edit commands. `Postpone` has no rescheduling behaviour yet
/// and resolves to [`Transition::Blocked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MarkDone,
    MarkInProgress,
    MarkBlocked,
    Postpone,
    IncreasePriority,
}

impl Command {
    pub fn transition(&self) -> Transition {
        match self {
            Self::MarkDone => Transition::Done,
            Self::MarkInProgress => Transition::InProgress,
            Self::MarkBlocked | Self::Postpone => Transition::Blocked,
            Self::IncreasePriority => Transition::IncreasePriority,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.transition().apply(text)
    }

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::MarkDone => "done",
            Self::MarkInProgress => "in-progress",
            Self::MarkBlocked => "blocked",
            Self::Postpone => "postpone",
            Self::IncreasePriority => "promote",
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(Self::MarkDone),
            "in-progress" | "wip" => Ok(Self::MarkInProgress),
            "blocked" => Ok(Self::MarkBlocked),
            "postpone" => Ok(Self::Postpone),
            "promote" | "increase-priority" => Ok(Self::IncreasePriority),
            other => Err(format!(
                "unknown command '{}' (expected done, in-progress, blocked, postpone or promote)",
                other
            )),
        }
    }
}
