// Match and roster persistence.
//
// Backends exchange flat `MatchRecord` rows with the medium and convert them
// to typed `Match` values on load. Rows that cannot be typed are skipped with
// a warning; row-level mutations leave them untouched on disk.

pub mod csv_file;
pub mod sqlite;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{StorageBackend, StorageConfig};
use crate::model::{format_timestamp, parse_timestamp, Match, MatchType, Side, Team};

pub use self::csv_file::CsvStore;
pub use self::sqlite::SqliteStore;

/// Column order shared by `matches.csv` and the `matches` table.
pub const MATCH_COLUMNS: [&str; 9] = [
    "id",
    "date",
    "match_type",
    "team1_player1",
    "team1_player2",
    "team2_player1",
    "team2_player2",
    "set_score",
    "winner",
];

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Load-all / append / update-by-id / delete-by-id / save-all over matches,
/// plus the roster's player names.
pub trait MatchStore: Send {
    /// All matches in insertion order.
    fn load_matches(&self) -> Result<Vec<Match>>;

    /// Replace the stored matches with `matches`.
    fn save_matches(&self, matches: &[Match]) -> Result<()>;

    fn append_match(&self, m: &Match) -> Result<()>;

    /// Replace the stored match with the same id. Returns `false` if no such
    /// match exists.
    fn update_match(&self, m: &Match) -> Result<bool>;

    /// Returns `false` if no match has this id.
    fn delete_match(&self, id: &str) -> Result<bool>;

    /// Registered player names in registration order.
    fn load_players(&self) -> Result<Vec<String>>;

    fn save_players(&self, names: &[String]) -> Result<()>;
}

/// Open the backend selected in the config, creating the data directory if
/// needed.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn MatchStore>> {
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory {}", config.data_dir.display())
    })?;

    match config.backend {
        StorageBackend::Csv => {
            info!("Using CSV store in {}", config.data_dir.display());
            Ok(Box::new(CsvStore::open(&config.data_dir)?))
        }
        StorageBackend::Sqlite => {
            let path = config.db_path();
            info!("Using SQLite store at {}", path.display());
            let path = path
                .to_str()
                .with_context(|| format!("database path is not UTF-8: {}", path.display()))?;
            Ok(Box::new(SqliteStore::open(path)?))
        }
    }
}

// ---------------------------------------------------------------------------
// MatchRecord: the flat row shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("row has no id")]
    MissingId,

    #[error("unknown match type {0:?}")]
    UnknownMatchType(String),

    #[error("unknown winner {0:?}")]
    UnknownWinner(String),

    #[error("unreadable date {0:?}")]
    BadDate(String),
}

/// One stored row. Empty strings stand for absent player slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub match_type: String,
    #[serde(default)]
    pub team1_player1: String,
    #[serde(default)]
    pub team1_player2: String,
    #[serde(default)]
    pub team2_player1: String,
    #[serde(default)]
    pub team2_player2: String,
    #[serde(default)]
    pub set_score: String,
    #[serde(default)]
    pub winner: String,
}

impl From<&Match> for MatchRecord {
    fn from(m: &Match) -> Self {
        MatchRecord {
            id: m.id.clone(),
            date: format_timestamp(&m.timestamp),
            match_type: m.match_type.display_str().to_string(),
            team1_player1: m.team1.player1.clone(),
            team1_player2: m.team1.player2.clone().unwrap_or_default(),
            team2_player1: m.team2.player1.clone(),
            team2_player2: m.team2.player2.clone().unwrap_or_default(),
            set_score: m.set_score.clone(),
            winner: m.winner.display_str().to_string(),
        }
    }
}

impl MatchRecord {
    /// Type the row. The score is kept verbatim; a malformed score is the
    /// stats engine's concern, not the store's.
    pub fn to_match(&self) -> Result<Match, RecordError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(RecordError::MissingId);
        }
        let match_type = MatchType::from_str_type(&self.match_type)
            .ok_or_else(|| RecordError::UnknownMatchType(self.match_type.clone()))?;
        let winner = Side::from_str_side(&self.winner)
            .ok_or_else(|| RecordError::UnknownWinner(self.winner.clone()))?;
        let timestamp =
            parse_timestamp(&self.date).ok_or_else(|| RecordError::BadDate(self.date.clone()))?;

        Ok(Match {
            id: id.to_string(),
            timestamp,
            match_type,
            team1: Team::from_slots(&self.team1_player1, &self.team1_player2),
            team2: Team::from_slots(&self.team2_player1, &self.team2_player2),
            set_score: self.set_score.clone(),
            winner,
        })
    }

    pub fn to_row(&self) -> [&str; 9] {
        [
            &self.id,
            &self.date,
            &self.match_type,
            &self.team1_player1,
            &self.team1_player2,
            &self.team2_player1,
            &self.team2_player2,
            &self.set_score,
            &self.winner,
        ]
    }
}

/// Type every record, dropping (and logging) the ones that do not convert.
pub(crate) fn records_to_matches(records: &[MatchRecord]) -> Vec<Match> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| match record.to_match() {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(row = i + 1, id = %record.id, "skipping stored match: {e}");
                None
            }
        })
        .collect()
}
