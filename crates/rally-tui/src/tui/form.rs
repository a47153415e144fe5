// Match entry form state.
//
// Holds the editable fields of a match while the entry popup is open. Player
// slots cycle through roster names not already picked in another visible
// slot; the score cycles through completed-set outcomes (or is typed) and the
// winner follows the score's leader.

use rally_core::model::{Match, MatchDraft, MatchType, SetScore, Side, Team, VALID_SET_SCORES};

/// Longest score text the form accepts, e.g. `"12-10"`.
const MAX_SCORE_LEN: usize = 5;

/// Focusable fields, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    MatchType,
    Slot(usize),
    Score,
    Winner,
}

/// Slot labels in slot order: team1 player1, team1 player2, team2 player1,
/// team2 player2.
pub const SLOT_LABELS: [&str; 4] = [
    "Team 1 player",
    "Team 1 partner",
    "Team 2 player",
    "Team 2 partner",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchForm {
    /// Id of the match being edited; `None` for a new match.
    pub editing: Option<String>,
    pub match_type: MatchType,
    pub slots: [String; 4],
    pub score: String,
    pub winner: Side,
    pub focus: FormField,
}

impl Default for MatchForm {
    fn default() -> Self {
        MatchForm {
            editing: None,
            match_type: MatchType::Singles,
            slots: Default::default(),
            score: String::new(),
            winner: Side::Team1,
            focus: FormField::MatchType,
        }
    }
}

impl MatchForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill the form from a recorded match.
    pub fn from_match(m: &Match) -> Self {
        let MatchDraft {
            match_type,
            team1,
            team2,
            set_score,
            winner,
        } = m.to_draft();
        MatchForm {
            editing: Some(m.id.clone()),
            match_type,
            slots: [
                team1.player1,
                team1.player2.unwrap_or_default(),
                team2.player1,
                team2.player2.unwrap_or_default(),
            ],
            score: set_score,
            winner,
            focus: FormField::MatchType,
        }
    }

    pub fn title(&self) -> String {
        match &self.editing {
            Some(id) => format!(" Edit match {id} "),
            None => " New match ".to_string(),
        }
    }

    /// Slot indexes shown for the current match type.
    pub fn visible_slots(&self) -> Vec<usize> {
        match self.match_type {
            MatchType::Singles => vec![0, 2],
            MatchType::Doubles => vec![0, 1, 2, 3],
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::MatchType];
        fields.extend(self.visible_slots().into_iter().map(FormField::Slot));
        fields.push(FormField::Score);
        fields.push(FormField::Winner);
        fields
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, step: isize) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let len = fields.len() as isize;
        self.focus = fields[(current + step).rem_euclid(len) as usize];
    }

    /// Left/Right on the focused field.
    pub fn cycle(&mut self, step: isize, roster: &[String]) {
        match self.focus {
            FormField::MatchType => self.toggle_match_type(),
            FormField::Slot(slot) => self.cycle_slot(slot, step, roster),
            FormField::Score => self.cycle_score(step),
            FormField::Winner => self.winner = self.winner.other(),
        }
    }

    pub fn toggle_match_type(&mut self) {
        self.match_type = self.match_type.toggled();
        if self.match_type == MatchType::Singles {
            self.slots[1].clear();
            self.slots[3].clear();
        }
    }

    /// Names offered for `slot`: an empty choice followed by every roster
    /// player not already picked in another visible slot.
    pub fn slot_options(&self, slot: usize, roster: &[String]) -> Vec<String> {
        let taken: Vec<String> = self
            .visible_slots()
            .into_iter()
            .filter(|&other| other != slot)
            .map(|other| self.slots[other].to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        std::iter::once(String::new())
            .chain(
                roster
                    .iter()
                    .filter(|name| !taken.contains(&name.to_lowercase()))
                    .cloned(),
            )
            .collect()
    }

    pub fn cycle_slot(&mut self, slot: usize, step: isize, roster: &[String]) {
        let options = self.slot_options(slot, roster);
        let current = options
            .iter()
            .position(|name| name.to_lowercase() == self.slots[slot].to_lowercase())
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(options.len() as isize) as usize;
        self.slots[slot] = options[next].clone();
    }

    /// Step through the completed-set outcomes. The winner follows the
    /// score's leader.
    pub fn cycle_score(&mut self, step: isize) {
        let len = VALID_SET_SCORES.len() as isize;
        let current = SetScore::parse(&self.score)
            .ok()
            .and_then(|score| VALID_SET_SCORES.iter().position(|s| *s == score));
        let next = match current {
            Some(i) => (i as isize + step).rem_euclid(len) as usize,
            None if step < 0 => VALID_SET_SCORES.len() - 1,
            None => 0,
        };
        let score = VALID_SET_SCORES[next];
        self.score = score.to_string();
        if let Some(leader) = score.leader() {
            self.winner = leader;
        }
    }

    /// Typed input on the score field: digits and a single `-`.
    pub fn push_score_char(&mut self, c: char) {
        if self.score.len() >= MAX_SCORE_LEN {
            return;
        }
        let accepted = c.is_ascii_digit() || (c == '-' && !self.score.contains('-'));
        if accepted {
            self.score.push(c);
            if let Some(leader) = SetScore::parse(&self.score).ok().and_then(|s| s.leader()) {
                self.winner = leader;
            }
        }
    }

    pub fn pop_score_char(&mut self) {
        self.score.pop();
    }

    /// The draft submitted to the app. Validation happens there.
    pub fn to_draft(&self) -> MatchDraft {
        let (team1, team2) = match self.match_type {
            MatchType::Singles => (
                Team::singles(self.slots[0].trim()),
                Team::singles(self.slots[2].trim()),
            ),
            MatchType::Doubles => (
                Team::from_slots(&self.slots[0], &self.slots[1]),
                Team::from_slots(&self.slots[2], &self.slots[3]),
            ),
        };
        MatchDraft {
            match_type: self.match_type,
            team1,
            team2,
            set_score: self.score.trim().to_string(),
            winner: self.winner,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn roster() -> Vec<String> {
        ["Ann", "Bob", "Cleo", "Dev"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn singles_form_skips_partner_slots() {
        let mut form = MatchForm::new();
        assert_eq!(
            form.fields(),
            vec![
                FormField::MatchType,
                FormField::Slot(0),
                FormField::Slot(2),
                FormField::Score,
                FormField::Winner,
            ]
        );
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, FormField::Slot(2));
        form.focus_prev();
        form.focus_prev();
        form.focus_prev();
        assert_eq!(form.focus, FormField::Winner);
    }

    #[test]
    fn slot_cycling_skips_names_in_other_slots() {
        let mut form = MatchForm::new();
        form.focus = FormField::Slot(0);
        form.cycle(1, &roster());
        assert_eq!(form.slots[0], "Ann");

        form.focus = FormField::Slot(2);
        form.cycle(1, &roster());
        assert_eq!(form.slots[2], "Bob");

        let options = form.slot_options(0, &roster());
        assert_eq!(options, ["", "Ann", "Cleo", "Dev"]);

        // Backwards from empty wraps to the last free name.
        form.slots[2].clear();
        form.cycle(-1, &roster());
        assert_eq!(form.slots[2], "Dev");
    }

    #[test]
    fn slot_cycling_matches_non_ascii_casing() {
        let roster: Vec<String> = vec!["Élodie".into(), "Bob".into()];
        let mut form = MatchForm::new();
        form.focus = FormField::Slot(0);
        form.slots[0] = "élodie".into();
        form.cycle(1, &roster);
        assert_eq!(form.slots[0], "Bob");
    }

    #[test]
    fn hidden_partner_slots_do_not_block_names() {
        let mut form = MatchForm::new();
        form.slots[1] = "Bob".into();
        assert!(form.slot_options(0, &roster()).contains(&"Bob".to_string()));
    }

    #[test]
    fn switching_to_singles_clears_partners() {
        let mut form = MatchForm::new();
        form.toggle_match_type();
        assert_eq!(form.match_type, MatchType::Doubles);
        form.slots = ["Ann".into(), "Bob".into(), "Cleo".into(), "Dev".into()];
        form.toggle_match_type();
        assert_eq!(form.slots[1], "");
        assert_eq!(form.slots[3], "");
        assert_eq!(form.slots[2], "Cleo");
    }

    #[test]
    fn score_cycle_sets_winner() {
        let mut form = MatchForm::new();
        form.focus = FormField::Score;
        form.cycle(1, &roster());
        assert_eq!(form.score, "6-0");
        assert_eq!(form.winner, Side::Team1);

        form.cycle(-1, &roster());
        assert_eq!(form.score, "6-7");
        assert_eq!(form.winner, Side::Team2);

        form.score = "4-4".into();
        form.cycle(-1, &roster());
        assert_eq!(form.score, "6-7");
    }

    #[test]
    fn typed_score_accepts_digits_and_one_dash() {
        let mut form = MatchForm::new();
        for c in "3a--6".chars() {
            form.push_score_char(c);
        }
        assert_eq!(form.score, "3-6");
        assert_eq!(form.winner, Side::Team2);
        form.pop_score_char();
        assert_eq!(form.score, "3-");
    }

    #[test]
    fn to_draft_builds_teams_for_match_type() {
        let mut form = MatchForm::new();
        form.slots = ["Ann".into(), "".into(), " Bob ".into(), "".into()];
        form.score = "6-2".into();
        let draft = form.to_draft();
        assert_eq!(draft.team1, Team::singles("Ann"));
        assert_eq!(draft.team2, Team::singles("Bob"));

        form.match_type = MatchType::Doubles;
        form.slots[1] = "Cleo".into();
        let draft = form.to_draft();
        assert_eq!(draft.team1, Team::doubles("Ann", "Cleo"));
        assert_eq!(draft.team2, Team::singles("Bob"));
    }

    #[test]
    fn from_match_round_trips_to_draft() {
        let m = Match::create(
            "m1".into(),
            Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap(),
            MatchDraft {
                match_type: MatchType::Doubles,
                team1: Team::doubles("Ann", "Bob"),
                team2: Team::doubles("Cleo", "Dev"),
                set_score: "7-5".into(),
                winner: Side::Team1,
            },
        );
        let form = MatchForm::from_match(&m);
        assert_eq!(form.editing.as_deref(), Some("m1"));
        assert_eq!(form.to_draft(), m.to_draft());
        assert!(form.title().contains("m1"));
    }
}
