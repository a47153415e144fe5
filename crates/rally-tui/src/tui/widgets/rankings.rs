// Rankings widget: the club table ordered by points, wins, then games.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use rally_core::ranking::RankingRow;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the ranking table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Player"),
        Cell::from("Pts"),
        Cell::from("W"),
        Cell::from("Games"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = if state.ranking.is_empty() {
        vec![Row::new(vec![Cell::from(""), Cell::from("No matches recorded")])
            .style(Style::default().fg(Color::DarkGray))]
    } else {
        state.ranking.iter().map(ranking_row).collect()
    };

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Rankings ({})", state.ranking.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let selected = (!state.ranking.is_empty()).then(|| state.selected_index(TabId::Rankings));
    let mut table_state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn ranking_row(row: &RankingRow) -> Row<'static> {
    let style = if row.position == 1 {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(row.position.to_string()),
        Cell::from(row.name.clone()),
        Cell::from(row.points.to_string()),
        Cell::from(row.wins.to_string()),
        Cell::from(row.games.to_string()),
    ])
    .style(style)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
