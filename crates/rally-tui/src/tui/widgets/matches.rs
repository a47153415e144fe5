// Match list widget: recorded matches, newest first, with a text filter.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use rally_core::model::{Match, Side};

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the match list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible_matches();

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Type"),
        Cell::from("Team 1"),
        Cell::from("Team 2"),
        Cell::from("Score"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible.iter().map(|m| match_row(m)).collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state, visible.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let selected = (!visible.is_empty()).then(|| state.selected_index(TabId::Matches));
    let mut table_state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Matches where any player name contains `filter_text` (case-insensitive),
/// in insertion order. An empty filter keeps everything.
pub fn filter_matches<'a>(matches: &'a [Match], filter_text: &str) -> Vec<&'a Match> {
    let needle = filter_text.trim().to_lowercase();
    matches
        .iter()
        .filter(|m| {
            needle.is_empty()
                || m.team1
                    .members()
                    .into_iter()
                    .chain(m.team2.members())
                    .any(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// One table row. The winning team is bold; a score that does not parse is
/// shown in red since it counts for nothing.
fn match_row(m: &Match) -> Row<'static> {
    let winner_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let (team1_style, team2_style) = match m.winner {
        Side::Team1 => (winner_style, Style::default()),
        Side::Team2 => (Style::default(), winner_style),
    };
    let score_style = if m.score().is_ok() {
        Style::default()
    } else {
        Style::default().fg(Color::Red)
    };

    Row::new(vec![
        Cell::from(m.timestamp.format("%Y-%m-%d").to_string()),
        Cell::from(m.match_type.display_str()),
        Cell::from(m.team1.label()).style(team1_style),
        Cell::from(m.team2.label()).style(team2_style),
        Cell::from(m.set_score.clone()).style(score_style),
    ])
}

fn build_title(state: &ViewState, shown: usize) -> Line<'static> {
    let mut title = String::from("Matches");
    if !state.filter_text.is_empty() || state.filter_mode {
        title.push_str(&format!(" \"{}\"", state.filter_text));
        if state.filter_mode {
            title.push('_');
        }
    }
    title.push_str(&format!(" ({}/{})", shown, state.matches.len()));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::{sample_match, sample_state};
    use crate::tui::widgets::buffer_text;

    #[test]
    fn filter_empty_keeps_all() {
        let matches = vec![
            sample_match("m1", "Ann", "Bob", "6-3", Side::Team1),
            sample_match("m2", "Cleo", "Dev", "2-6", Side::Team2),
        ];
        assert_eq!(filter_matches(&matches, "").len(), 2);
        assert_eq!(filter_matches(&matches, "  ").len(), 2);
    }

    #[test]
    fn filter_by_player_name_substring() {
        let matches = vec![
            sample_match("m1", "Ann", "Bob", "6-3", Side::Team1),
            sample_match("m2", "Cleo", "Dev", "2-6", Side::Team2),
            sample_match("m3", "Annika", "Dev", "6-1", Side::Team1),
        ];
        let ids: Vec<&str> = filter_matches(&matches, "ANN")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, ["m1", "m3"]);
        assert!(filter_matches(&matches, "zoe").is_empty());
    }

    #[test]
    fn title_shows_filter_and_counts() {
        let mut state = sample_state();
        assert_eq!(build_title(&state, 3).to_string(), "Matches (3/3)");
        state.filter_text = "an".into();
        state.filter_mode = true;
        assert_eq!(build_title(&state, 2).to_string(), "Matches \"an\"_ (2/3)");
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_shows_newest_first() {
        let backend = ratatui::backend::TestBackend::new(90, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = sample_state();
        state.active_tab = TabId::Matches;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        let newest = text.find("7-5").unwrap();
        let oldest = text.find("6-3").unwrap();
        assert!(newest < oldest);
        assert!(text.contains("2026-06-04"));
    }
}
