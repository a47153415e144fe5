// Confirmation overlay for quitting and destructive edits.
//
// Renders a centered modal dialog on top of the main layout while
// `ViewState::confirm` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::Confirm;

const DIALOG_HEIGHT: u16 = 5;
const MIN_DIALOG_WIDTH: u16 = 28;

/// Title and question for a pending confirmation.
pub fn prompt(confirm: &Confirm) -> (&'static str, String) {
    match confirm {
        Confirm::Quit => (" Quit? ", "Really quit?".to_string()),
        Confirm::DeleteMatch(id) => (" Delete match? ", format!("Delete match {id}?")),
        Confirm::RemovePlayer(name) => (
            " Remove player? ",
            format!("Remove {name} from the roster?"),
        ),
    }
}

/// Render the confirmation overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, confirm: &Confirm) {
    let (title, question) = prompt(confirm);
    let width = (question.chars().count() as u16 + 12).max(MIN_DIALOG_WIDTH);
    let dialog_area = centered_rect(width, DIALOG_HEIGHT, area);

    // Clear the area behind the dialog so it renders cleanly on top
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Line::from(vec![
        Span::raw(format!("  {question} (")),
        Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("/"),
        Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(")"),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the dialog is clamped to the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
