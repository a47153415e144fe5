// Player detail sidebar: totals, rank, and doubles partners for the player
// selected in the main panel.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use rally_core::ranking::{player_detail, PlayerDetail};

use crate::tui::ViewState;

/// Partners listed below the best partner line.
const MAX_PARTNERS: usize = 8;

/// Render the detail panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(name) = state.selected_player() else {
        let paragraph = Paragraph::new("  No player selected.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Player"));
        frame.render_widget(paragraph, area);
        return;
    };

    let detail = player_detail(&state.stats, name);
    let paragraph = Paragraph::new(detail_lines(state, &detail))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Player: {}", detail.name)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Text lines for one player's detail.
pub fn detail_lines(state: &ViewState, detail: &PlayerDetail) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let rank = state
        .ranking
        .iter()
        .find(|row| row.name == detail.name)
        .map_or_else(|| "--".to_string(), |row| format!("#{}", row.position));
    let played = state
        .matches
        .iter()
        .filter(|m| m.involves(&detail.name))
        .count();

    let mut lines = vec![
        Line::from(vec![Span::styled(" Rank:    ", label), Span::styled(rank, value)]),
        Line::from(vec![
            Span::styled(" Points:  ", label),
            Span::styled(detail.points.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled(" Wins:    ", label),
            Span::styled(format!("{} of {}", detail.wins, played), value),
        ]),
        Line::from(vec![
            Span::styled(" Games:   ", label),
            Span::styled(detail.games.to_string(), value),
        ]),
        Line::from(""),
    ];

    match &detail.best_partner {
        Some((partner, count)) => {
            lines.push(Line::from(vec![
                Span::styled(" Best partner: ", label),
                Span::styled(format!("{partner} ({count})"), value.fg(Color::Green)),
            ]));
            for (partner, count) in detail.partners.iter().take(MAX_PARTNERS) {
                lines.push(Line::from(format!("   {partner:<16} {count}")));
            }
            if detail.partners.len() > MAX_PARTNERS {
                lines.push(Line::from(Span::styled(
                    format!("   +{} more", detail.partners.len() - MAX_PARTNERS),
                    label,
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(" No doubles played", label))),
    }

    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TabId;
    use crate::tui::tests::sample_state;
    use crate::tui::widgets::buffer_text;
    use chrono::{TimeZone, Utc};
    use rally_core::model::{Match, MatchDraft, MatchType, Side, Team};
    use rally_core::ranking::build_ranking;
    use rally_core::stats::compute_stats;

    fn lines_text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn singles_player_has_no_partner() {
        let state = sample_state();
        let detail = player_detail(&state.stats, "Ann");
        let text = lines_text(&detail_lines(&state, &detail));
        assert_eq!(text[0], " Rank:    #1");
        assert_eq!(text[2], " Wins:    2 of 2");
        assert!(text.iter().any(|l| l.contains("No doubles played")));
    }

    #[test]
    fn doubles_partners_are_listed() {
        let mut state = sample_state();
        state.matches.push(Match::create(
            "m4".into(),
            Utc.with_ymd_and_hms(2026, 6, 5, 18, 0, 0).unwrap(),
            MatchDraft {
                match_type: MatchType::Doubles,
                team1: Team::doubles("Ann", "Cleo"),
                team2: Team::doubles("Bob", "Dev"),
                set_score: "6-4".into(),
                winner: Side::Team1,
            },
        ));
        state.stats = compute_stats(&state.matches);
        state.ranking = build_ranking(&state.stats);

        let detail = player_detail(&state.stats, "Dev");
        let text = lines_text(&detail_lines(&state, &detail));
        assert!(text.iter().any(|l| l == " Best partner: Bob (1)"));
        assert!(text.iter().any(|l| l.trim_start().starts_with("Bob")));
    }

    #[test]
    fn unranked_player_shows_placeholder_rank() {
        let mut state = sample_state();
        state.roster.push("Eve".into());
        let detail = player_detail(&state.stats, "Eve");
        let text = lines_text(&detail_lines(&state, &detail));
        assert_eq!(text[0], " Rank:    --");
        assert_eq!(text[1], " Points:  0");
    }

    #[test]
    fn render_shows_selected_player() {
        let backend = ratatui::backend::TestBackend::new(40, 16);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = sample_state();
        state.active_tab = TabId::Players;
        state.selected.insert(TabId::Players, 3);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        assert!(buffer_text(terminal.backend().buffer()).contains("Player: Dev"));
    }

    #[test]
    fn render_without_selection() {
        let backend = ratatui::backend::TestBackend::new(40, 16);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        assert!(buffer_text(terminal.backend().buffer()).contains("No player selected"));
    }
}
