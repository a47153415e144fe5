// Players widget: the club roster with each player's season totals, plus the
// "add player" input popup.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use rally_core::ranking::player_detail;

use crate::protocol::TabId;
use crate::tui::widgets::confirm::centered_rect;
use crate::tui::ViewState;

const INPUT_WIDTH: u16 = 40;
const INPUT_HEIGHT: u16 = 3;

/// Render the roster table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
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

    let rows: Vec<Row> = if state.roster.is_empty() {
        vec![Row::new(vec![Cell::from("No players registered (a to add)")])
            .style(Style::default().fg(Color::DarkGray))]
    } else {
        state
            .roster
            .iter()
            .map(|name| {
                let (points, wins, games) = totals(state, name);
                let style = if games == 0 {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(name.clone()),
                    Cell::from(points.to_string()),
                    Cell::from(wins.to_string()),
                    Cell::from(games.to_string()),
                ])
                .style(style)
            })
            .collect()
    };

    let widths = [
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
                .title(format!("Players ({})", state.roster.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let selected = (!state.roster.is_empty()).then(|| state.selected_index(TabId::Players));
    let mut table_state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Points, wins and games for `name`; zeros for a player with no matches.
pub fn totals(state: &ViewState, name: &str) -> (u32, u32, u32) {
    let detail = player_detail(&state.stats, name);
    (detail.points, detail.wins, detail.games)
}

/// Render the "add player" input centered on the screen.
pub fn render_add_player(frame: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(INPUT_WIDTH, INPUT_HEIGHT, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Add player ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(input.to_string(), Style::default().fg(Color::White)),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);

    let paragraph = Paragraph::new(line)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, popup);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
