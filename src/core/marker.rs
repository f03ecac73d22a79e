use serde::Serialize;
use std::fmt;

/// Ordered priority tiers. `Waiting` is declared for completeness but no
/// marker produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Waiting,
    Low,
    Normal,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Critical or High.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The marker vocabulary.
///
/// Classification and transition targets live together in this enum so the
/// two cannot drift apart. Done markers are transition targets only; the
/// scanning pattern never matches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Normal,
    High,
    Critical,
    InProgress,
    InProgressHigh,
    InProgressCritical,
    Blocked,
    BlockedHigh,
    BlockedCritical,
    Done,
    TodoKeyword,
    WipKeyword,
    BlockedKeyword,
    DoneKeyword,
    OpenBox,
    StartedBox,
    BlockedBox,
    CheckedBox,
}

/// Rewrites a marker can undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Done,
    InProgress,
    Blocked,
    IncreasePriority,
}

impl Marker {
    pub const ALL: [Marker; 18] = [
        Self::Normal,
        Self::High,
        Self::Critical,
        Self::InProgress,
        Self::InProgressHigh,
        Self::InProgressCritical,
        Self::Blocked,
        Self::BlockedHigh,
        Self::BlockedCritical,
        Self::Done,
        Self::TodoKeyword,
        Self::WipKeyword,
        Self::BlockedKeyword,
        Self::DoneKeyword,
        Self::OpenBox,
        Self::StartedBox,
        Self::BlockedBox,
        Self::CheckedBox,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::Normal => "\u{1F537}",                // 🔷
            Self::High => "\u{2757}",                   // ❗
            Self::Critical => "\u{203C}\u{FE0F}",       // ‼️
            Self::InProgress => "\u{23F3}",             // ⏳
            Self::InProgressHigh => "\u{1F4C8}",        // 📈
            Self::InProgressCritical => "\u{1F525}",    // 🔥
            Self::Blocked => "\u{2753}",                // ❓
            Self::BlockedHigh => "\u{26A0}\u{FE0F}",    // ⚠️
            Self::BlockedCritical => "\u{1F6A9}",       // 🚩
            Self::Done => "\u{2705}",                   // ✅
            Self::TodoKeyword => "TODO:",
            Self::WipKeyword => "WIP:",
            Self::BlockedKeyword => "BLOCKED:",
            Self::DoneKeyword => "DONE:",
            Self::OpenBox => "[ ]",
            Self::StartedBox => "[-]",
            Self::BlockedBox => "[!]",
            Self::CheckedBox => "[x]",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.token() == token)
    }

    pub fn priority(&self) -> Priority {
        match self {
            Self::Critical | Self::InProgressCritical | Self::BlockedCritical => Priority::Critical,
            Self::High | Self::InProgressHigh | Self::BlockedHigh | Self::BlockedKeyword | Self::BlockedBox => {
                Priority::High
            }
            Self::Normal | Self::InProgress | Self::Blocked | Self::WipKeyword | Self::StartedBox => {
                Priority::Normal
            }
            Self::TodoKeyword | Self::OpenBox | Self::Done | Self::DoneKeyword | Self::CheckedBox => {
                Priority::Low
            }
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::InProgress
                | Self::InProgressHigh
                | Self::InProgressCritical
                | Self::WipKeyword
                | Self::StartedBox
        )
    }

    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            Self::Blocked | Self::BlockedHigh | Self::BlockedCritical | Self::BlockedKeyword | Self::BlockedBox
        )
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done | Self::DoneKeyword | Self::CheckedBox)
    }

    /// Markers the scanning pattern recognizes as open items.
    pub fn is_active(&self) -> bool {
        !self.is_done()
    }

    /// The marker `transition` rewrites this one to, or `None` when it is left alone.
    pub fn target(&self, transition: Transition) -> Option<Marker> {
        match transition {
            Transition::Done => self.done_target(),
            Transition::InProgress => self.in_progress_target(),
            Transition::Blocked => self.blocked_target(),
            Transition::IncreasePriority => self.promoted(),
        }
    }

    fn done_target(&self) -> Option<Marker> {
        match self {
            Self::TodoKeyword | Self::WipKeyword | Self::BlockedKeyword => Some(Self::DoneKeyword),
            Self::OpenBox | Self::StartedBox | Self::BlockedBox => Some(Self::CheckedBox),
            Self::Done | Self::DoneKeyword | Self::CheckedBox => None,
            _ => Some(Self::Done),
        }
    }

    fn in_progress_target(&self) -> Option<Marker> {
        match self {
            Self::OpenBox | Self::BlockedBox => Some(Self::StartedBox),
            Self::TodoKeyword | Self::BlockedKeyword => Some(Self::WipKeyword),
            Self::Done | Self::Normal | Self::Blocked => Some(Self::InProgress),
            Self::High | Self::BlockedHigh => Some(Self::InProgressHigh),
            Self::Critical | Self::BlockedCritical => Some(Self::InProgressCritical),
            _ => None,
        }
    }

    fn blocked_target(&self) -> Option<Marker> {
        match self {
            Self::OpenBox | Self::StartedBox => Some(Self::BlockedBox),
            Self::TodoKeyword | Self::WipKeyword => Some(Self::BlockedKeyword),
            Self::Done | Self::Normal | Self::InProgress => Some(Self::Blocked),
            Self::High | Self::InProgressHigh => Some(Self::BlockedHigh),
            Self::Critical | Self::InProgressCritical => Some(Self::BlockedCritical),
            _ => None,
        }
    }

    /// One tier up on the same status axis; `None` at the top or for done markers.
    pub fn promoted(&self) -> Option<Marker> {
        match self {
            Self::TodoKeyword | Self::OpenBox => Some(Self::Normal),
            Self::Normal => Some(Self::High),
            Self::High => Some(Self::Critical),
            Self::WipKeyword | Self::StartedBox | Self::InProgress => Some(Self::InProgressHigh),
            Self::InProgressHigh => Some(Self::InProgressCritical),
            Self::Blocked => Some(Self::BlockedHigh),
            Self::BlockedKeyword | Self::BlockedBox | Self::BlockedHigh => Some(Self::BlockedCritical),
            _ => None,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
