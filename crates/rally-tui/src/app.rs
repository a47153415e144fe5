// Application state and orchestration logic.
//
// Owns the store plus the in-memory copy of matches and roster. Applies user
// commands from the TUI, recomputes stats after every change, and pushes
// snapshots and status messages back over the UI channel.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rally_core::config::{Config, StorageBackend};
use rally_core::model::{generate_match_id, Match, MatchDraft};
use rally_core::ranking::{build_ranking, RankingRow};
use rally_core::roster::Roster;
use rally_core::stats::{compute_stats, StatsTable};
use rally_core::store::MatchStore;

use crate::protocol::{AppSnapshot, StatusMessage, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub store: Box<dyn MatchStore>,
    pub roster: Roster,
    /// Insertion order, as loaded from the store.
    pub matches: Vec<Match>,
    pub stats: StatsTable,
    pub ranking: Vec<RankingRow>,
}

impl AppState {
    /// Load roster and matches from `store`. An empty roster is seeded from
    /// `club.seed_players`.
    pub fn load(config: Config, store: Box<dyn MatchStore>) -> anyhow::Result<Self> {
        let mut state = AppState {
            config,
            store,
            roster: Roster::default(),
            matches: Vec::new(),
            stats: StatsTable::default(),
            ranking: Vec::new(),
        };
        state.reload()?;
        if state.seed_roster()? {
            info!("Seeded roster with {} players", state.roster.len());
        }
        Ok(state)
    }

    /// Re-read everything from the store and recompute stats.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        let names = self.store.load_players().context("failed to load players")?;
        self.roster = Roster::from_names(&names);
        if self.roster.len() != names.len() {
            warn!(
                "Ignored {} blank or duplicate roster entries",
                names.len() - self.roster.len()
            );
        }
        self.load_matches()?;
        info!(
            "Loaded {} players and {} matches",
            self.roster.len(),
            self.matches.len()
        );
        Ok(())
    }

    fn seed_roster(&mut self) -> anyhow::Result<bool> {
        if !self.roster.is_empty() || self.config.club.seed_players.is_empty() {
            return Ok(false);
        }
        let seeded = Roster::from_names(&self.config.club.seed_players);
        self.store
            .save_players(seeded.names())
            .context("failed to save seed players")?;
        self.roster = seeded;
        self.roster_changed();
        Ok(true)
    }

    /// Recompute stats and ranking. Only players with matches are ranked;
    /// `stats` also carries an all-zero entry for every other roster player.
    pub fn refresh_stats(&mut self) {
        let stats = compute_stats(&self.matches);
        self.ranking = build_ranking(&stats);
        self.stats = stats.with_roster(&self.roster);
        debug!(
            "Stats refreshed: {} ranked players from {} matches",
            self.ranking.len(),
            self.matches.len()
        );
    }

    /// Read matches from the store with player names in roster spelling, so a
    /// hand-edited `ann` counts toward the registered `Ann`.
    fn load_matches(&mut self) -> anyhow::Result<()> {
        let mut matches = self.store.load_matches().context("failed to load matches")?;
        for m in &mut matches {
            m.canonicalize_names(&self.roster);
        }
        self.matches = matches;
        self.refresh_stats();
        Ok(())
    }

    fn roster_changed(&mut self) {
        for m in &mut self.matches {
            m.canonicalize_names(&self.roster);
        }
        self.refresh_stats();
    }

    /// Validate and store a new match, or replace the one with id `editing`.
    /// Returns the id of the stored match.
    pub fn submit_match(
        &mut self,
        editing: Option<&str>,
        draft: MatchDraft,
        now: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let draft = draft.validate(&self.roster, &self.config.rules)?;

        let id = match editing {
            Some(id) => {
                let Some(existing) = self.matches.iter().find(|m| m.id == id) else {
                    bail!("match {id} no longer exists");
                };
                let mut updated = existing.clone();
                updated.apply_edit(draft);
                if !self.store.update_match(&updated)? {
                    bail!("match {id} no longer exists");
                }
                info!("Updated match {id}");
                id.to_string()
            }
            None => {
                let id = generate_match_id(now, |candidate| {
                    self.matches.iter().any(|m| m.id == candidate)
                });
                let created = Match::create(id.clone(), now, draft);
                self.store.append_match(&created)?;
                info!(
                    "Recorded match {id}: {} vs {} ({})",
                    created.team1.label(),
                    created.team2.label(),
                    created.set_score
                );
                id
            }
        };

        self.load_matches()?;
        Ok(id)
    }

    pub fn delete_match(&mut self, id: &str) -> anyhow::Result<bool> {
        let deleted = self.store.delete_match(id)?;
        if deleted {
            info!("Deleted match {id}");
        }
        self.load_matches()?;
        Ok(deleted)
    }

    /// Register a player and persist the roster. Returns the stored name.
    pub fn add_player(&mut self, name: &str) -> anyhow::Result<String> {
        let mut roster = self.roster.clone();
        let added = roster.add(name)?.to_string();
        self.store.save_players(roster.names())?;
        self.roster = roster;
        self.roster_changed();
        info!("Added player {added}");
        Ok(added)
    }

    /// Unregister a player. Their recorded matches stay in the ledger.
    pub fn remove_player(&mut self, name: &str) -> anyhow::Result<bool> {
        let mut roster = self.roster.clone();
        if !roster.remove(name) {
            return Ok(false);
        }
        self.store.save_players(roster.names())?;
        self.roster = roster;
        self.roster_changed();
        info!("Removed player {name}");
        Ok(true)
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            club_name: self.config.club.name.clone(),
            backend: match self.config.storage.backend {
                StorageBackend::Csv => "csv".to_string(),
                StorageBackend::Sqlite => "sqlite".to_string(),
            },
            matches: self.matches.clone(),
            roster: self.roster.names().to_vec(),
            stats: self.stats.clone(),
            ranking: self.ranking.clone(),
        }
    }

    /// Apply one command and describe the outcome for the status bar.
    pub fn handle_command(&mut self, cmd: UserCommand) -> StatusMessage {
        let result = match cmd {
            UserCommand::SubmitMatch { editing, draft } => {
                let is_edit = editing.is_some();
                self.submit_match(editing.as_deref(), draft, Utc::now())
                    .map(|id| {
                        if is_edit {
                            format!("Updated match {id}")
                        } else {
                            format!("Recorded match {id}")
                        }
                    })
            }
            UserCommand::DeleteMatch(id) => self.delete_match(&id).map(|deleted| {
                if deleted {
                    format!("Deleted match {id}")
                } else {
                    format!("Match {id} was already gone")
                }
            }),
            UserCommand::AddPlayer(name) => self
                .add_player(&name)
                .map(|added| format!("Added {added} to the roster")),
            UserCommand::RemovePlayer(name) => self.remove_player(&name).map(|removed| {
                if removed {
                    format!("Removed {name} from the roster")
                } else {
                    format!("{name} is not on the roster")
                }
            }),
            UserCommand::Reload => self
                .reload()
                .map(|()| format!("Reloaded {} matches", self.matches.len())),
            UserCommand::Quit => Ok(String::new()),
        };

        match result {
            Ok(text) => StatusMessage::Info(text),
            Err(e) => {
                warn!("Command failed: {e:#}");
                StatusMessage::Error(format!("{e:#}"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the app task: send an initial snapshot, then apply commands until
/// `Quit` arrives or the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;

    while let Some(cmd) = cmd_rx.recv().await {
        if cmd == UserCommand::Quit {
            info!("Quit command received, shutting down");
            break;
        }
        let status = state.handle_command(cmd);
        let _ = ui_tx
            .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
            .await;
        let _ = ui_tx.send(UiUpdate::Status(status)).await;
    }

    info!("Application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
