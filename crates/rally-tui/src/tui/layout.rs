// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Main Panel (65%)         | Player Detail (35%)    |
// |                          |                        |
// +-------------------------+------------------------+
// | Message Line (1 row)                              |
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: club name, storage backend, tab bar.
    pub status_bar: Rect,
    /// Tab-switched content area.
    pub main_panel: Rect,
    /// Detail for the selected player.
    pub sidebar: Rect,
    /// Result of the last command.
    pub message_line: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | message(1) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // main + sidebar
            Constraint::Length(1), // message line
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(vertical[1]);

    AppLayout {
        status_bar: vertical[0],
        main_panel: horizontal[0],
        sidebar: horizontal[1],
        message_line: vertical[2],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    fn all_rects(layout: &AppLayout) -> [(&'static str, Rect); 5] {
        [
            ("status_bar", layout.status_bar),
            ("main_panel", layout.main_panel),
            ("sidebar", layout.sidebar),
            ("message_line", layout.message_line),
            ("help_bar", layout.help_bar),
        ]
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        for (name, rect) in all_rects(&layout) {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_single_row_bars() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.message_line.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert!(layout.message_line.y < layout.help_bar.y);
    }

    #[test]
    fn layout_main_panel_wider_than_sidebar() {
        let layout = build_layout(test_area());
        assert!(layout.main_panel.width > layout.sidebar.width);
        assert_eq!(layout.main_panel.y, layout.sidebar.y);
        assert_eq!(layout.main_panel.height, layout.sidebar.height);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        for (name, rect) in all_rects(&layout) {
            assert!(rect.x + rect.width <= area.width, "{name} exceeds width");
            assert!(rect.y + rect.height <= area.height, "{name} exceeds height");
        }
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        let layout = build_layout(Rect::new(0, 0, 40, 12));
        for (name, rect) in all_rects(&layout) {
            assert!(
                rect.width > 0 && rect.height > 0,
                "Small terminal: {name} has zero area"
            );
        }
    }
}
