// Match entry popup: one line per form field, the focused field highlighted.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::form::{FormField, MatchForm, SLOT_LABELS};
use crate::tui::widgets::confirm::centered_rect;

const FORM_WIDTH: u16 = 48;

/// Render the form centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, form: &MatchForm) {
    let lines = form_lines(form);
    // Fields plus borders and the hint line.
    let height = lines.len() as u16 + 2;
    let popup = centered_rect(FORM_WIDTH, height, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            form.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, popup);
}

/// Label and current value of a field as displayed.
pub fn field_text(form: &MatchForm, field: FormField) -> (&'static str, String) {
    match field {
        FormField::MatchType => ("Type", form.match_type.display_str().to_string()),
        FormField::Slot(slot) => {
            let value = if form.slots[slot].is_empty() {
                "--".to_string()
            } else {
                form.slots[slot].clone()
            };
            (SLOT_LABELS[slot], value)
        }
        FormField::Score => ("Score", form.score.clone()),
        FormField::Winner => ("Winner", form.winner.display_str().to_string()),
    }
}

pub fn form_lines(form: &MatchForm) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = form
        .fields()
        .into_iter()
        .map(|field| {
            let (label, value) = field_text(form, field);
            let focused = field == form.focus;
            let (marker, style) = if focused {
                (
                    ">",
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (" ", Style::default().fg(Color::White))
            };
            Line::from(vec![
                Span::raw(format!("{marker} {label:<15} ")),
                Span::styled(format!("< {value} >"), style),
            ])
        })
        .collect();

    lines.push(Line::from(Span::styled(
        "  Enter to save, Esc to cancel",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;
    use rally_core::model::MatchType;

    #[test]
    fn singles_form_has_two_player_lines() {
        let form = MatchForm::new();
        let lines = form_lines(&form);
        // type, two slots, score, winner, hint
        assert_eq!(lines.len(), 6);
        assert!(lines[0].to_string().starts_with("> Type"));
    }

    #[test]
    fn doubles_form_has_four_player_lines() {
        let mut form = MatchForm::new();
        form.match_type = MatchType::Doubles;
        form.slots[1] = "Bob".into();
        assert_eq!(form_lines(&form).len(), 8);
        assert_eq!(
            field_text(&form, FormField::Slot(1)),
            ("Team 1 partner", "Bob".to_string())
        );
        assert_eq!(
            field_text(&form, FormField::Slot(3)),
            ("Team 2 partner", "--".to_string())
        );
    }

    #[test]
    fn render_shows_title_and_fields() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut form = MatchForm::new();
        form.score = "6-4".into();
        terminal
            .draw(|frame| render(frame, frame.area(), &form))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("New match"));
        assert!(text.contains("< 6-4 >"));
        assert!(text.contains("< Team1 >"));
    }
}
