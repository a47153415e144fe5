// Messages exchanged between the TUI and the app task.

use rally_core::model::{Match, MatchDraft};
use rally_core::ranking::RankingRow;
use rally_core::stats::StatsTable;

/// Main panel tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TabId {
    #[default]
    Rankings,
    Matches,
    Players,
}

impl TabId {
    pub const ALL: [TabId; 3] = [TabId::Rankings, TabId::Matches, TabId::Players];

    pub fn next(self) -> Self {
        match self {
            TabId::Rankings => TabId::Matches,
            TabId::Matches => TabId::Players,
            TabId::Players => TabId::Rankings,
        }
    }
}

/// Commands sent from the TUI to the app task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Record a new match, or replace the match with id `editing`.
    SubmitMatch {
        editing: Option<String>,
        draft: MatchDraft,
    },
    DeleteMatch(String),
    AddPlayer(String),
    RemovePlayer(String),
    /// Re-read matches and roster from the store.
    Reload,
    Quit,
}

/// Everything the TUI renders, rebuilt after each change.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub club_name: String,
    pub backend: String,
    /// Insertion order, oldest first.
    pub matches: Vec<Match>,
    pub roster: Vec<String>,
    pub stats: StatsTable,
    pub ranking: Vec<RankingRow>,
}

/// Result of a command, shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }
}

/// Updates pushed from the app task to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    Status(StatusMessage),
}
