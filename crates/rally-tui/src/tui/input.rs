// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app task,
// or into local ViewState mutations (tab switching, selection, filtering,
// form editing).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::form::{FormField, MatchForm};
use super::{Confirm, ViewState};
use crate::protocol::{TabId, UserCommand};

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app task. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release; act on Press only.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm.is_some() {
        return handle_confirm(key_event, view_state);
    }
    if view_state.form.is_some() {
        return handle_form(key_event, view_state);
    }
    if view_state.player_input.is_some() {
        return handle_player_input(key_event, view_state);
    }
    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Rankings;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Matches;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Players;
            None
        }
        KeyCode::Tab => {
            view_state.active_tab = view_state.active_tab.next();
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_selection(view_state, -(PAGE_SIZE as isize));
            None
        }
        KeyCode::PageDown => {
            move_selection(view_state, PAGE_SIZE as isize);
            None
        }

        // Filter only applies to the match list
        KeyCode::Char('/') => {
            if view_state.active_tab == TabId::Matches {
                view_state.filter_mode = true;
            }
            None
        }
        KeyCode::Esc => {
            view_state.filter_text.clear();
            None
        }

        KeyCode::Char('n') => {
            view_state.form = Some(MatchForm::new());
            None
        }
        KeyCode::Char('e') => {
            if view_state.active_tab == TabId::Matches {
                view_state.form = view_state.selected_match().map(MatchForm::from_match);
            }
            None
        }
        KeyCode::Char('d') | KeyCode::Char('x') => {
            view_state.confirm = match view_state.active_tab {
                TabId::Matches => view_state
                    .selected_match()
                    .map(|m| Confirm::DeleteMatch(m.id.clone())),
                TabId::Players => view_state
                    .roster
                    .get(view_state.selected_index(TabId::Players))
                    .map(|name| Confirm::RemovePlayer(name.clone())),
                TabId::Rankings => None,
            };
            None
        }
        KeyCode::Char('a') => {
            view_state.active_tab = TabId::Players;
            view_state.player_input = Some(String::new());
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Reload),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm = Some(Confirm::Quit);
            None
        }

        _ => None,
    }
}

/// `y` confirms (or `q` for quit), `n`/Esc cancels, everything else is
/// blocked.
fn handle_confirm(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let is_quit = view_state.confirm == Some(Confirm::Quit);
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm.take().map(|confirm| match confirm {
                Confirm::Quit => UserCommand::Quit,
                Confirm::DeleteMatch(id) => UserCommand::DeleteMatch(id),
                Confirm::RemovePlayer(name) => UserCommand::RemovePlayer(name),
            })
        }
        KeyCode::Char('q') | KeyCode::Char('Q') if is_quit => Some(UserCommand::Quit),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm = None;
            None
        }
        _ => None,
    }
}

fn handle_form(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let roster = &view_state.roster;
    let form = view_state.form.as_mut()?;

    match key_event.code {
        KeyCode::Esc => {
            view_state.form = None;
            view_state.awaiting_result = false;
            None
        }
        KeyCode::Enter => {
            let cmd = UserCommand::SubmitMatch {
                editing: form.editing.clone(),
                draft: form.to_draft(),
            };
            view_state.awaiting_result = true;
            Some(cmd)
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            None
        }
        KeyCode::Left => {
            form.cycle(-1, roster);
            None
        }
        KeyCode::Right | KeyCode::Char(' ') => {
            form.cycle(1, roster);
            None
        }
        KeyCode::Char(c) if form.focus == FormField::Score => {
            form.push_score_char(c);
            None
        }
        KeyCode::Backspace if form.focus == FormField::Score => {
            form.pop_score_char();
            None
        }
        _ => None,
    }
}

fn handle_player_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let input = view_state.player_input.as_mut()?;
    match key_event.code {
        KeyCode::Esc => {
            view_state.player_input = None;
            view_state.awaiting_result = false;
            None
        }
        KeyCode::Enter => {
            if input.trim().is_empty() {
                return None;
            }
            let name = input.clone();
            view_state.awaiting_result = true;
            Some(UserCommand::AddPlayer(name))
        }
        KeyCode::Backspace => {
            input.pop();
            None
        }
        KeyCode::Char(c) => {
            input.push(c);
            None
        }
        _ => None,
    }
}

/// Printable characters extend the filter, Backspace removes, Enter keeps
/// the text, Esc clears it.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
        }
        _ => return None,
    }
    // The visible list changed; start from the top.
    view_state.selected.insert(TabId::Matches, 0);
    None
}

fn move_selection(view_state: &mut ViewState, step: isize) {
    let tab = view_state.active_tab;
    let len = view_state.row_count(tab);
    if len == 0 {
        view_state.selected.insert(tab, 0);
        return;
    }
    let current = view_state.selected_index(tab) as isize;
    let next = (current + step).clamp(0, len as isize - 1) as usize;
    view_state.selected.insert(tab, next);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_state;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use rally_core::model::Side;

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            handle_key(key(KeyCode::Char(c)), state);
        }
    }

    // -- Tabs and selection --

    #[test]
    fn number_keys_switch_tabs() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('2')), &mut state).is_none());
        assert_eq!(state.active_tab, TabId::Matches);
        handle_key(key(KeyCode::Char('3')), &mut state);
        assert_eq!(state.active_tab, TabId::Players);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.active_tab, TabId::Rankings);
    }

    #[test]
    fn selection_is_clamped_to_rows() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.selected_index(TabId::Rankings), 0);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.selected_index(TabId::Rankings), 2);
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.selected_index(TabId::Rankings), 3);
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.selected_index(TabId::Rankings), 2);
        // Other tabs keep their own selection.
        assert_eq!(state.selected_index(TabId::Players), 0);
    }

    #[test]
    fn selection_on_empty_list_stays_zero() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.selected_index(TabId::Rankings), 0);
    }

    #[test]
    fn non_press_events_are_ignored() {
        let mut state = ViewState::default();
        let mut release = key(KeyCode::Char('2'));
        release.kind = KeyEventKind::Release;
        assert!(handle_key(release, &mut state).is_none());
        assert_eq!(state.active_tab, TabId::Rankings);
    }

    // -- Quit --

    #[test]
    fn q_asks_for_confirmation() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(state.confirm, Some(Confirm::Quit));
        // Other keys are blocked while confirming.
        assert!(handle_key(key(KeyCode::Char('2')), &mut state).is_none());
        assert_eq!(state.active_tab, TabId::Rankings);
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn quit_can_be_cancelled() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(state.confirm.is_none());
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut state = ViewState::default();
        state.form = Some(MatchForm::new());
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    // -- Matches --

    #[test]
    fn delete_selected_match_after_confirm() {
        let mut state = sample_state();
        state.active_tab = TabId::Matches;
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('d')), &mut state);
        assert_eq!(state.confirm, Some(Confirm::DeleteMatch("m2".into())));
        // `q` only confirms quitting.
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::DeleteMatch("m2".into()))
        );
        assert!(state.confirm.is_none());
    }

    #[test]
    fn delete_does_nothing_on_rankings() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('d')), &mut state);
        assert!(state.confirm.is_none());
    }

    #[test]
    fn edit_prefills_form_from_selected_match() {
        let mut state = sample_state();
        state.active_tab = TabId::Matches;
        handle_key(key(KeyCode::Char('e')), &mut state);
        let form = state.form.as_ref().unwrap();
        assert_eq!(form.editing.as_deref(), Some("m3"));
        assert_eq!(form.score, "7-5");

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        match cmd {
            Some(UserCommand::SubmitMatch { editing, draft }) => {
                assert_eq!(editing.as_deref(), Some("m3"));
                assert_eq!(draft.set_score, "7-5");
            }
            other => panic!("expected SubmitMatch, got {other:?}"),
        }
        assert!(state.awaiting_result);
        // The form stays open until the app answers.
        assert!(state.form.is_some());
    }

    #[test]
    fn new_match_form_flow() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('n')), &mut state);
        assert!(state.form.is_some());

        // Type: Singles. Slots: Ann vs Bob. Score: typed 6-4.
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Tab), &mut state);
        type_text(&mut state, "6-4");

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        match cmd {
            Some(UserCommand::SubmitMatch { editing, draft }) => {
                assert_eq!(editing, None);
                assert_eq!(draft.team1.player1, "Ann");
                assert_eq!(draft.team2.player1, "Bob");
                assert_eq!(draft.set_score, "6-4");
                assert_eq!(draft.winner, Side::Team1);
            }
            other => panic!("expected SubmitMatch, got {other:?}"),
        }
    }

    #[test]
    fn letters_in_form_do_not_trigger_shortcuts() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('n')), &mut state);
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm.is_none());
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.form.is_none());
    }

    // -- Filter --

    #[test]
    fn filter_only_on_matches_tab() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert!(!state.filter_mode);

        state.active_tab = TabId::Matches;
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert!(state.filter_mode);
        type_text(&mut state, "dev");
        assert_eq!(state.filter_text, "dev");
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.filter_text, "de");
        handle_key(key(KeyCode::Enter), &mut state);
        assert!(!state.filter_mode);
        assert_eq!(state.filter_text, "de");

        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.filter_text.is_empty());
    }

    #[test]
    fn q_in_filter_mode_is_text() {
        let mut state = sample_state();
        state.active_tab = TabId::Matches;
        state.filter_mode = true;
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(state.filter_text, "q");
        assert!(state.confirm.is_none());
    }

    // -- Players --

    #[test]
    fn add_player_input() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert_eq!(state.active_tab, TabId::Players);
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());

        type_text(&mut state, "Eve");
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::AddPlayer("Eve".into()))
        );
        assert!(state.awaiting_result);
    }

    #[test]
    fn remove_player_after_confirm() {
        let mut state = sample_state();
        state.active_tab = TabId::Players;
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('x')), &mut state);
        assert_eq!(state.confirm, Some(Confirm::RemovePlayer("Bob".into())));
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::RemovePlayer("Bob".into()))
        );
    }

    #[test]
    fn r_reloads() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::Reload)
        );
    }
}
