// Match records, set scores, and entry-form validation.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RulesConfig;
use crate::roster::{normalize_name, Roster};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("malformed set score {0:?}: expected \"<games>-<games>\"")]
    Malformed(String),

    #[error("set score {0:?} has more than {max} games for one side", max = MAX_SET_GAMES)]
    OutOfRange(String),
}

/// Reasons a submitted match is refused before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no player selected for {slot}")]
    MissingPlayer { slot: String },

    #[error("{slot} must be empty for a singles match")]
    UnexpectedPartner { slot: String },

    #[error("{0} is listed more than once")]
    DuplicatePlayer(String),

    #[error("{0} is not on the roster")]
    UnknownPlayer(String),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("{0} is not a valid set score")]
    InvalidSetScore(String),

    #[error("score {score} does not match winner {winner}")]
    WinnerMismatch { score: String, winner: Side },
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    Singles,
    Doubles,
}

impl MatchType {
    /// Parse a match type as written in the `match_type` column.
    /// Accepts any casing; surrounding whitespace is ignored.
    pub fn from_str_type(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "singles" => Some(MatchType::Singles),
            "doubles" => Some(MatchType::Doubles),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            MatchType::Singles => "Singles",
            MatchType::Doubles => "Doubles",
        }
    }

    /// Players per side.
    pub fn team_size(&self) -> usize {
        match self {
            MatchType::Singles => 1,
            MatchType::Doubles => 2,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            MatchType::Singles => MatchType::Doubles,
            MatchType::Doubles => MatchType::Singles,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// One side of the net. Also used for the `winner` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    /// Parse `"Team1"` / `"Team2"` (any casing, optional inner space).
    pub fn from_str_side(s: &str) -> Option<Self> {
        let compact: String = s.split_whitespace().collect::<String>().to_lowercase();
        match compact.as_str() {
            "team1" => Some(Side::Team1),
            "team2" => Some(Side::Team2),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Side::Team1 => "Team1",
            Side::Team2 => "Team2",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// Ordered pair of player slots. The second slot is `None` for singles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Team {
    pub player1: String,
    pub player2: Option<String>,
}

impl Team {
    pub fn singles(player: impl Into<String>) -> Self {
        Team {
            player1: player.into(),
            player2: None,
        }
    }

    pub fn doubles(player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Team {
            player1: player1.into(),
            player2: Some(player2.into()),
        }
    }

    /// Build a team from two raw column values; an empty second column
    /// means no partner.
    pub fn from_slots(player1: &str, player2: &str) -> Self {
        let player2 = player2.trim();
        Team {
            player1: player1.trim().to_string(),
            player2: (!player2.is_empty()).then(|| player2.to_string()),
        }
    }

    /// Names of the populated slots, in slot order. Blank slots are skipped.
    pub fn members(&self) -> Vec<&str> {
        std::iter::once(self.player1.as_str())
            .chain(self.player2.as_deref())
            .filter(|name| !name.trim().is_empty())
            .collect()
    }

    /// Case-insensitive membership, using the same folding as the roster.
    pub fn contains(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        self.members().iter().any(|m| m.to_lowercase() == key)
    }

    /// Replace each populated slot with its roster spelling. Unregistered
    /// names are only whitespace-normalized.
    pub fn canonicalize(&mut self, roster: &Roster) {
        let canonical = |raw: &str| {
            let name = normalize_name(raw);
            roster.resolve(&name).map_or(name, str::to_string)
        };
        self.player1 = canonical(&self.player1);
        self.player2 = self
            .player2
            .as_deref()
            .map(canonical)
            .filter(|name| !name.is_empty());
    }

    /// Display form: `"Ann"` or `"Ann / Bob"`.
    pub fn label(&self) -> String {
        self.members().join(" / ")
    }
}

// ---------------------------------------------------------------------------
// Set score
// ---------------------------------------------------------------------------

/// Largest game count a side may have in a stored score.
pub const MAX_SET_GAMES: u32 = 99;

/// Games won by each side in a single set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetScore {
    pub team1: u32,
    pub team2: u32,
}

/// Every completed-set outcome accepted by strict validation, team1's games
/// first. Team1 wins the first seven, team2 the last seven.
pub const VALID_SET_SCORES: [SetScore; 14] = [
    SetScore::new(6, 0),
    SetScore::new(6, 1),
    SetScore::new(6, 2),
    SetScore::new(6, 3),
    SetScore::new(6, 4),
    SetScore::new(7, 5),
    SetScore::new(7, 6),
    SetScore::new(0, 6),
    SetScore::new(1, 6),
    SetScore::new(2, 6),
    SetScore::new(3, 6),
    SetScore::new(4, 6),
    SetScore::new(5, 7),
    SetScore::new(6, 7),
];

impl SetScore {
    pub const fn new(team1: u32, team2: u32) -> Self {
        SetScore { team1, team2 }
    }

    /// Parse `"<int>-<int>"`. Whitespace around the whole string and around
    /// each number is tolerated; anything else is malformed. Either side
    /// above `MAX_SET_GAMES` is out of range.
    pub fn parse(s: &str) -> Result<Self, ScoreError> {
        let malformed = || ScoreError::Malformed(s.to_string());
        let (left, right) = s.trim().split_once('-').ok_or_else(malformed)?;
        let team1 = left.trim().parse::<u32>().map_err(|_| malformed())?;
        let team2 = right.trim().parse::<u32>().map_err(|_| malformed())?;
        if team1 > MAX_SET_GAMES || team2 > MAX_SET_GAMES {
            return Err(ScoreError::OutOfRange(s.to_string()));
        }
        Ok(SetScore { team1, team2 })
    }

    pub fn games_for(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }

    /// The side with more games, or `None` for a tie.
    pub fn leader(&self) -> Option<Side> {
        match self.team1.cmp(&self.team2) {
            std::cmp::Ordering::Greater => Some(Side::Team1),
            std::cmp::Ordering::Less => Some(Side::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_valid_set(&self) -> bool {
        VALID_SET_SCORES.contains(self)
    }
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team1, self.team2)
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A recorded match. Created once from a validated draft; edits replace
/// type, teams, score and winner wholesale while keeping `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub match_type: MatchType,
    pub team1: Team,
    pub team2: Team,
    /// Raw `"G-G"` string as stored; parsed on demand.
    pub set_score: String,
    pub winner: Side,
}

impl Match {
    pub fn create(id: String, timestamp: DateTime<Utc>, draft: MatchDraft) -> Self {
        Match {
            id,
            timestamp,
            match_type: draft.match_type,
            team1: draft.team1,
            team2: draft.team2,
            set_score: draft.set_score,
            winner: draft.winner,
        }
    }

    pub fn apply_edit(&mut self, draft: MatchDraft) {
        self.match_type = draft.match_type;
        self.team1 = draft.team1;
        self.team2 = draft.team2;
        self.set_score = draft.set_score;
        self.winner = draft.winner;
    }

    pub fn score(&self) -> Result<SetScore, ScoreError> {
        SetScore::parse(&self.set_score)
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    /// Whether `name` plays on either side (case-insensitive).
    pub fn involves(&self, name: &str) -> bool {
        self.team1.contains(name) || self.team2.contains(name)
    }

    /// Put every player name into its roster spelling.
    pub fn canonicalize_names(&mut self, roster: &Roster) {
        self.team1.canonicalize(roster);
        self.team2.canonicalize(roster);
    }

    /// Editable fields of this match, e.g. to prefill the entry form.
    pub fn to_draft(&self) -> MatchDraft {
        MatchDraft {
            match_type: self.match_type,
            team1: self.team1.clone(),
            team2: self.team2.clone(),
            set_score: self.set_score.clone(),
            winner: self.winner,
        }
    }

    /// Timestamp as written to the `date` column.
    pub fn date_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a `date` column. Accepts RFC 3339 timestamps and bare `YYYY-MM-DD`
/// dates (taken as midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Generate a match id from the creation time: `mYYYYMMDDHHMMSSmmm`.
/// If `taken` reports a collision, a `-2`, `-3`, ... suffix is appended.
pub fn generate_match_id(now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
    let base = now.format("m%Y%m%d%H%M%S%3f").to_string();
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

// ---------------------------------------------------------------------------
// Draft (entry form payload) and validation
// ---------------------------------------------------------------------------

/// Editable fields of a match as submitted by the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDraft {
    pub match_type: MatchType,
    pub team1: Team,
    pub team2: Team,
    pub set_score: String,
    pub winner: Side,
}

impl MatchDraft {
    /// Check the draft against the roster and the club's rules, returning it
    /// with player names replaced by their roster spelling and the score
    /// normalized to `"G-G"`.
    pub fn validate(
        self,
        roster: &Roster,
        rules: &RulesConfig,
    ) -> Result<MatchDraft, MatchError> {
        let MatchDraft {
            match_type,
            team1,
            team2,
            set_score,
            winner,
        } = self;

        let team1 = canonical_team(&team1, match_type, "team1", roster, rules)?;
        let team2 = canonical_team(&team2, match_type, "team2", roster, rules)?;

        let mut seen: Vec<String> = Vec::with_capacity(4);
        for name in team1.members().into_iter().chain(team2.members()) {
            let key = name.to_lowercase();
            if seen.contains(&key) {
                return Err(MatchError::DuplicatePlayer(name.to_string()));
            }
            seen.push(key);
        }

        let score = SetScore::parse(&set_score)?;
        if rules.strict_scores {
            if !score.is_valid_set() {
                return Err(MatchError::InvalidSetScore(score.to_string()));
            }
            if score.leader() != Some(winner) {
                return Err(MatchError::WinnerMismatch {
                    score: score.to_string(),
                    winner,
                });
            }
        }

        Ok(MatchDraft {
            match_type,
            team1,
            team2,
            set_score: score.to_string(),
            winner,
        })
    }
}

fn canonical_team(
    team: &Team,
    match_type: MatchType,
    label: &str,
    roster: &Roster,
    rules: &RulesConfig,
) -> Result<Team, MatchError> {
    let player1 = canonical_slot(&team.player1, roster, rules)?.ok_or_else(|| {
        MatchError::MissingPlayer {
            slot: format!("{label}_player1"),
        }
    })?;
    let player2 = match team.player2.as_deref() {
        Some(raw) => canonical_slot(raw, roster, rules)?,
        None => None,
    };

    match (match_type, player2) {
        (MatchType::Singles, None) => Ok(Team::singles(player1)),
        (MatchType::Singles, Some(_)) => Err(MatchError::UnexpectedPartner {
            slot: format!("{label}_player2"),
        }),
        (MatchType::Doubles, Some(player2)) => Ok(Team::doubles(player1, player2)),
        (MatchType::Doubles, None) => Err(MatchError::MissingPlayer {
            slot: format!("{label}_player2"),
        }),
    }
}

fn canonical_slot(
    raw: &str,
    roster: &Roster,
    rules: &RulesConfig,
) -> Result<Option<String>, MatchError> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Ok(None);
    }
    match roster.resolve(&name) {
        Some(canonical) => Ok(Some(canonical.to_string())),
        None if rules.require_registered => Err(MatchError::UnknownPlayer(name)),
        None => Ok(Some(name)),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
