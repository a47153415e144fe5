// Per-player aggregation over the full match list.
//
// A single fold over the matches in input order. Each player gets an explicit
// zero-valued `PlayerStats` the first time they are referenced; nothing is
// cached between calls.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::{Match, MatchType, Side};
use crate::roster::Roster;

/// League points awarded to each member of the winning side.
pub const POINTS_PER_WIN: u32 = 3;

// ---------------------------------------------------------------------------
// PlayerStats
// ---------------------------------------------------------------------------

/// Derived totals for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub name: String,
    /// `POINTS_PER_WIN` per match won.
    pub points: u32,
    pub wins: u32,
    /// Games won by the player's own side, summed over every match played.
    pub games: u32,
    /// Doubles partners and how many matches were played together, in the
    /// order each partner was first seen.
    pub partners: Vec<(String, u32)>,
}

impl PlayerStats {
    pub fn new(name: impl Into<String>) -> Self {
        PlayerStats {
            name: name.into(),
            ..Default::default()
        }
    }

    fn add_partner(&mut self, partner: &str) {
        match self.partners.iter_mut().find(|(name, _)| name == partner) {
            Some((_, count)) => *count = count.saturating_add(1),
            None => self.partners.push((partner.to_string(), 1)),
        }
    }
}

// ---------------------------------------------------------------------------
// StatsTable
// ---------------------------------------------------------------------------

/// Player name to `PlayerStats`, iterated in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsTable {
    entries: Vec<PlayerStats>,
    index: HashMap<String, usize>,
}

impl StatsTable {
    pub fn get(&self, name: &str) -> Option<&PlayerStats> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerStats> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an all-zero entry for every roster player without matches.
    pub fn with_roster(mut self, roster: &Roster) -> Self {
        for name in roster.names() {
            self.entry_mut(name);
        }
        self
    }

    fn entry_mut(&mut self, name: &str) -> &mut PlayerStats {
        let next = self.entries.len();
        let i = *self.index.entry(name.to_string()).or_insert(next);
        if i == next {
            self.entries.push(PlayerStats::new(name));
        }
        &mut self.entries[i]
    }

    /// Fold one match into the table. Returns `false` if the match was
    /// skipped because its score could not be parsed.
    fn record(&mut self, m: &Match) -> bool {
        let score = match m.score() {
            Ok(score) => score,
            Err(e) => {
                warn!(match_id = %m.id, "excluding match from stats: {e}");
                return false;
            }
        };

        let team1 = side_members(m, Side::Team1);
        let team2 = side_members(m, Side::Team2);

        for (side, members) in [(Side::Team1, &team1), (Side::Team2, &team2)] {
            let won = side == m.winner;
            let games = score.games_for(side);
            for name in members {
                let entry = self.entry_mut(name);
                if won {
                    entry.points = entry.points.saturating_add(POINTS_PER_WIN);
                    entry.wins = entry.wins.saturating_add(1);
                }
                entry.games = entry.games.saturating_add(games);
            }
        }

        if m.match_type == MatchType::Doubles {
            for members in [&team1, &team2] {
                if let [a, b] = members.as_slice() {
                    self.entry_mut(a).add_partner(b);
                    self.entry_mut(b).add_partner(a);
                }
            }
        }

        true
    }
}

/// Populated, de-duplicated slots for one side of a match.
fn side_members(m: &Match, side: Side) -> Vec<&str> {
    let mut members: Vec<&str> = Vec::with_capacity(2);
    for name in m.team(side).members() {
        if members.contains(&name) {
            warn!(match_id = %m.id, player = name, "player listed twice on {side}; counting once");
            continue;
        }
        members.push(name);
    }
    members
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Aggregate points, wins, games and partner counts for every player who
/// appears in `matches`.
///
/// Matches whose score does not parse are excluded entirely; blank player
/// slots are ignored. An empty input gives an empty table.
pub fn compute_stats(matches: &[Match]) -> StatsTable {
    let mut skipped = 0usize;
    let table = matches.iter().fold(StatsTable::default(), |mut table, m| {
        if !table.record(m) {
            skipped += 1;
        }
        table
    });
    debug!(
        matches = matches.len(),
        skipped,
        players = table.len(),
        "computed player stats"
    );
    table
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
