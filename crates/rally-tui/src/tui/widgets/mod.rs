// TUI widget modules for each panel and popup.

pub mod confirm;
pub mod match_form;
pub mod matches;
pub mod player_detail;
pub mod rankings;
pub mod roster;
pub mod status_bar;

/// Concatenate every cell symbol of a rendered buffer, row by row.
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}
