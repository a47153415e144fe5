// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the app task's data. The app pushes
// `UiUpdate` messages over an mpsc channel; the TUI applies them to
// `ViewState` and re-renders at ~30 fps.

pub mod form;
pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use rally_core::model::Match;
use rally_core::ranking::RankingRow;
use rally_core::stats::StatsTable;

use crate::protocol::{AppSnapshot, StatusMessage, TabId, UiUpdate, UserCommand};

use form::MatchForm;
use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A destructive action waiting for y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    Quit,
    DeleteMatch(String),
    RemovePlayer(String),
}

/// TUI-local state that mirrors the application state for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    pub club_name: String,
    pub backend: String,
    /// Insertion order, oldest first. The match list shows newest first.
    pub matches: Vec<Match>,
    pub roster: Vec<String>,
    pub stats: StatsTable,
    pub ranking: Vec<RankingRow>,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Selected row per tab.
    pub selected: HashMap<TabId, usize>,
    /// Match list filter text.
    pub filter_text: String,
    /// Whether the filter input is active.
    pub filter_mode: bool,
    /// Open match entry form.
    pub form: Option<MatchForm>,
    /// Open "add player" input.
    pub player_input: Option<String>,
    pub confirm: Option<Confirm>,
    /// Result of the last command.
    pub status: Option<StatusMessage>,
    /// A form or player input was submitted and awaits its status.
    pub awaiting_result: bool,
}

impl ViewState {
    /// Apply a full state snapshot from the app task. Selections are clamped
    /// to the new list lengths.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.club_name = snapshot.club_name;
        self.backend = snapshot.backend;
        self.matches = snapshot.matches;
        self.roster = snapshot.roster;
        self.stats = snapshot.stats;
        self.ranking = snapshot.ranking;
        for tab in TabId::ALL {
            let len = self.row_count(tab);
            if let Some(sel) = self.selected.get_mut(&tab) {
                *sel = (*sel).min(len.saturating_sub(1));
            }
        }
    }

    /// Apply a command result. A successful submit closes the popup it came
    /// from; an error leaves it open for correction.
    pub fn apply_status(&mut self, status: StatusMessage) {
        if self.awaiting_result {
            self.awaiting_result = false;
            if !status.is_error() {
                self.form = None;
                self.player_input = None;
            }
        }
        self.status = Some(status);
    }

    pub fn selected_index(&self, tab: TabId) -> usize {
        self.selected.get(&tab).copied().unwrap_or(0)
    }

    /// Matches shown on the Matches tab: filtered, newest first.
    pub fn visible_matches(&self) -> Vec<&Match> {
        let mut visible = widgets::matches::filter_matches(&self.matches, &self.filter_text);
        visible.reverse();
        visible
    }

    pub fn row_count(&self, tab: TabId) -> usize {
        match tab {
            TabId::Rankings => self.ranking.len(),
            TabId::Matches => self.visible_matches().len(),
            TabId::Players => self.roster.len(),
        }
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.visible_matches()
            .get(self.selected_index(TabId::Matches))
            .copied()
    }

    /// Player shown in the detail sidebar for the active tab.
    pub fn selected_player(&self) -> Option<&str> {
        match self.active_tab {
            TabId::Rankings => self
                .ranking
                .get(self.selected_index(TabId::Rankings))
                .map(|row| row.name.as_str()),
            TabId::Matches => self.selected_match().map(|m| m.team1.player1.as_str()),
            TabId::Players => self
                .roster
                .get(self.selected_index(TabId::Players))
                .map(String::as_str),
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Status(status) => state.apply_status(status),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame: panels first, then any open popup on top.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    widgets::player_detail::render(frame, layout.sidebar, state);
    render_message_line(frame, &layout, state);
    render_help_bar(frame, &layout, state);

    if let Some(form) = &state.form {
        widgets::match_form::render(frame, frame.area(), form);
    } else if let Some(input) = &state.player_input {
        widgets::roster::render_add_player(frame, frame.area(), input);
    }
    if let Some(confirm) = &state.confirm {
        widgets::confirm::render(frame, frame.area(), confirm);
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.active_tab {
        TabId::Rankings => widgets::rankings::render(frame, layout.main_panel, state),
        TabId::Matches => widgets::matches::render(frame, layout.main_panel, state),
        TabId::Players => widgets::roster::render(frame, layout.main_panel, state),
    }
}

fn render_message_line(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let line = match &state.status {
        Some(StatusMessage::Error(text)) => Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Some(StatusMessage::Info(text)) => {
            Line::from(Span::styled(format!(" {text}"), Style::default().fg(Color::Green)))
        }
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), layout.message_line);
}

/// Key hints for the current mode.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm.is_some() {
        " y:Confirm | n/Esc:Cancel"
    } else if state.form.is_some() {
        " Tab/Up/Down:Field | Left/Right:Change | 0-9,-:Score | Enter:Save | Esc:Cancel"
    } else if state.player_input.is_some() {
        " Type a name | Enter:Add | Esc:Cancel"
    } else if state.filter_mode {
        " Type to filter | Enter:Keep | Esc:Clear"
    } else {
        match state.active_tab {
            TabId::Rankings => " q:Quit | 1-3:Tabs | j/k:Select | n:New match | r:Reload",
            TabId::Matches => {
                " q:Quit | 1-3:Tabs | j/k:Select | n:New | e:Edit | d:Delete | /:Filter | r:Reload"
            }
            TabId::Players => " q:Quit | 1-3:Tabs | j/k:Select | a:Add | x:Remove | r:Reload",
        }
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the default panic output.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    // 3. Render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 4. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
