// Ranking table and single-player detail views derived from a StatsTable.

use crate::stats::{PlayerStats, StatsTable};

/// One line of the ranking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    /// 1-based place in the table.
    pub position: usize,
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub games: u32,
}

/// Everything shown for a single player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDetail {
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub games: u32,
    /// Partners sorted by matches together, most frequent first.
    pub partners: Vec<(String, u32)>,
    pub best_partner: Option<(String, u32)>,
}

/// Rank every player in `stats` by points, then wins, then games won, all
/// descending. The sort is stable, so full ties keep first-appearance order.
pub fn build_ranking(stats: &StatsTable) -> Vec<RankingRow> {
    let mut ordered: Vec<&PlayerStats> = stats.iter().collect();
    ordered.sort_by(|a, b| {
        (b.points, b.wins, b.games).cmp(&(a.points, a.wins, a.games))
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankingRow {
            position: i + 1,
            name: s.name.clone(),
            points: s.points,
            wins: s.wins,
            games: s.games,
        })
        .collect()
}

/// Partners sorted by count descending; equal counts keep the order in which
/// the partners were first seen.
pub fn sorted_partners(stats: &PlayerStats) -> Vec<(String, u32)> {
    let mut partners = stats.partners.clone();
    partners.sort_by(|a, b| b.1.cmp(&a.1));
    partners
}

/// Most frequent partner. `None` when the player has never played doubles.
pub fn best_partner(stats: &PlayerStats) -> Option<(&str, u32)> {
    stats
        .partners
        .iter()
        .fold(None, |best: Option<(&str, u32)>, (name, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((name.as_str(), *count)),
        })
}

/// Detail view for `name`. A player with no recorded matches (for example a
/// roster player who has not played yet) gets all-zero totals.
pub fn player_detail(stats: &StatsTable, name: &str) -> PlayerDetail {
    match stats.get(name) {
        Some(s) => PlayerDetail {
            name: s.name.clone(),
            points: s.points,
            wins: s.wins,
            games: s.games,
            partners: sorted_partners(s),
            best_partner: best_partner(s).map(|(n, c)| (n.to_string(), c)),
        },
        None => PlayerDetail {
            name: name.to_string(),
            points: 0,
            wins: 0,
            games: 0,
            partners: Vec::new(),
            best_partner: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Match, MatchDraft, MatchType, Side, Team};
    use crate::stats::compute_stats;
    use chrono::Utc;

    fn singles(a: &str, b: &str, score: &str, winner: Side) -> Match {
        Match::create(
            format!("{a}-{b}-{score}"),
            Utc::now(),
            MatchDraft {
                match_type: MatchType::Singles,
                team1: Team::singles(a),
                team2: Team::singles(b),
                set_score: score.into(),
                winner,
            },
        )
    }

    fn doubles(a: &str, b: &str, c: &str, d: &str, score: &str, winner: Side) -> Match {
        Match::create(
            format!("{a}{b}{c}{d}-{score}"),
            Utc::now(),
            MatchDraft {
                match_type: MatchType::Doubles,
                team1: Team::doubles(a, b),
                team2: Team::doubles(c, d),
                set_score: score.into(),
                winner,
            },
        )
    }

    fn names(rows: &[RankingRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn empty_stats_rank_nobody() {
        assert!(build_ranking(&compute_stats(&[])).is_empty());
    }

    #[test]
    fn ranking_orders_by_points_wins_games() {
        let matches = vec![
            singles("Ann", "Bob", "6-4", Side::Team1),
            singles("Cleo", "Dev", "7-5", Side::Team1),
            singles("Bob", "Dev", "6-0", Side::Team1),
            singles("Ann", "Cleo", "3-6", Side::Team2),
        ];
        // Ann 3pts 9g, Bob 3pts 10g, Cleo 6pts 13g, Dev 0pts 5g
        let rows = build_ranking(&compute_stats(&matches));
        assert_eq!(names(&rows), ["Cleo", "Bob", "Ann", "Dev"]);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].points, 6);
        assert_eq!(rows[3].position, 4);
        assert_eq!(rows[3].games, 5);
    }

    #[test]
    fn full_ties_keep_first_appearance_order() {
        let matches = vec![
            doubles("Dev", "Ann", "Bob", "Cleo", "6-3", Side::Team1),
        ];
        let rows = build_ranking(&compute_stats(&matches));
        assert_eq!(names(&rows), ["Dev", "Ann", "Bob", "Cleo"]);
    }

    #[test]
    fn wins_break_point_ties_before_games() {
        let mut matches = vec![
            singles("Ann", "Bob", "6-0", Side::Team1),
            singles("Bob", "Cleo", "7-6", Side::Team1),
        ];
        // Ann 3/1/6, Bob 3/1/7 => Bob first on games.
        assert_eq!(names(&build_ranking(&compute_stats(&matches)))[..2], ["Bob", "Ann"]);

        matches.push(singles("Ann", "Dev", "6-0", Side::Team1));
        assert_eq!(names(&build_ranking(&compute_stats(&matches)))[0], "Ann");
    }

    #[test]
    fn best_partner_prefers_first_seen_on_ties() {
        let mut matches = vec![
            doubles("A", "B", "C", "D", "6-1", Side::Team1),
            doubles("A", "C", "B", "D", "6-1", Side::Team1),
        ];
        let stats = compute_stats(&matches);
        assert_eq!(best_partner(stats.get("A").unwrap()), Some(("B", 1)));

        matches.push(doubles("B", "C", "A", "D", "1-6", Side::Team2));
        matches.push(doubles("C", "B", "A", "D", "6-4", Side::Team1));
        let stats = compute_stats(&matches);
        let detail = player_detail(&stats, "B");
        assert_eq!(detail.best_partner, Some(("C".to_string(), 2)));
        assert_eq!(
            detail.partners,
            vec![
                ("C".to_string(), 2),
                ("A".to_string(), 1),
                ("D".to_string(), 1)
            ]
        );
    }

    #[test]
    fn no_partner_is_distinct_from_zero() {
        let stats = compute_stats(&[singles("Ann", "Bob", "6-2", Side::Team1)]);
        let detail = player_detail(&stats, "Ann");
        assert_eq!((detail.points, detail.wins, detail.games), (3, 1, 6));
        assert!(detail.partners.is_empty());
        assert_eq!(detail.best_partner, None);
    }

    #[test]
    fn unknown_player_detail_is_zeroed() {
        let stats = compute_stats(&[singles("Ann", "Bob", "6-2", Side::Team1)]);
        let detail = player_detail(&stats, "Eve");
        assert_eq!(detail.name, "Eve");
        assert_eq!((detail.points, detail.wins, detail.games), (0, 0, 0));
        assert_eq!(detail.best_partner, None);
    }

    #[test]
    fn sorted_partners_is_stable() {
        let matches = vec![
            doubles("A", "B", "C", "D", "6-1", Side::Team1),
            doubles("A", "C", "B", "D", "6-1", Side::Team1),
            doubles("A", "D", "B", "C", "6-1", Side::Team1),
            doubles("A", "D", "B", "C", "6-1", Side::Team1),
        ];
        let stats = compute_stats(&matches);
        let sorted = sorted_partners(stats.get("A").unwrap());
        assert_eq!(
            sorted,
            vec![
                ("D".to_string(), 2),
                ("B".to_string(), 1),
                ("C".to_string(), 1)
            ]
        );
    }
}
