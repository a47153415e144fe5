// SQLite backend for matches and the roster.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use super::{records_to_matches, MatchRecord, MatchStore};
use crate::model::Match;

/// SQLite-backed persistence. Insertion order is kept through an
/// autoincrementing `seq` column; `id` is the match's public identifier.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const SELECT_MATCHES: &str = "SELECT id, date, match_type, team1_player1, team1_player2,
        team2_player1, team2_player2, set_score, winner
     FROM matches ORDER BY seq";

const INSERT_MATCH: &str = "INSERT INTO matches
        (id, date, match_type, team1_player1, team1_player2,
         team2_player1, team2_player2, set_score, winner)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

impl SqliteStore {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS matches (
                seq           INTEGER PRIMARY KEY AUTOINCREMENT,
                id            TEXT NOT NULL UNIQUE,
                date          TEXT NOT NULL,
                match_type    TEXT NOT NULL,
                team1_player1 TEXT NOT NULL DEFAULT '',
                team1_player2 TEXT NOT NULL DEFAULT '',
                team2_player1 TEXT NOT NULL DEFAULT '',
                team2_player2 TEXT NOT NULL DEFAULT '',
                set_score     TEXT NOT NULL,
                winner        TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS players (
                seq  INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Raw rows, including those that do not convert to a `Match`.
    pub fn read_records(&self) -> Result<Vec<MatchRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(SELECT_MATCHES)
            .context("failed to prepare load_matches query")?;

        let records = stmt
            .query_map([], record_from_row)
            .context("failed to query matches")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map match rows")?;

        Ok(records)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        match_type: row.get(2)?,
        team1_player1: row.get(3)?,
        team1_player2: row.get(4)?,
        team2_player1: row.get(5)?,
        team2_player2: row.get(6)?,
        set_score: row.get(7)?,
        winner: row.get(8)?,
    })
}

fn insert_record(conn: &Connection, r: &MatchRecord) -> rusqlite::Result<usize> {
    conn.execute(
        INSERT_MATCH,
        params![
            r.id,
            r.date,
            r.match_type,
            r.team1_player1,
            r.team1_player2,
            r.team2_player1,
            r.team2_player2,
            r.set_score,
            r.winner,
        ],
    )
}

impl MatchStore for SqliteStore {
    fn load_matches(&self) -> Result<Vec<Match>> {
        Ok(records_to_matches(&self.read_records()?))
    }

    /// Replace all matches in a single transaction.
    fn save_matches(&self, matches: &[Match]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM matches", [])
            .context("failed to clear matches")?;
        for m in matches {
            insert_record(&tx, &MatchRecord::from(m))
                .with_context(|| format!("failed to insert match {}", m.id))?;
        }
        tx.commit().context("failed to commit save_matches")?;
        Ok(())
    }

    fn append_match(&self, m: &Match) -> Result<()> {
        let conn = self.conn();
        insert_record(&conn, &MatchRecord::from(m))
            .with_context(|| format!("failed to append match {}", m.id))?;
        Ok(())
    }

    fn update_match(&self, m: &Match) -> Result<bool> {
        let conn = self.conn();
        let r = MatchRecord::from(m);
        let changed = conn
            .execute(
                "UPDATE matches SET
                    date = ?2, match_type = ?3,
                    team1_player1 = ?4, team1_player2 = ?5,
                    team2_player1 = ?6, team2_player2 = ?7,
                    set_score = ?8, winner = ?9
                 WHERE id = ?1",
                params![
                    r.id,
                    r.date,
                    r.match_type,
                    r.team1_player1,
                    r.team1_player2,
                    r.team2_player1,
                    r.team2_player2,
                    r.set_score,
                    r.winner,
                ],
            )
            .with_context(|| format!("failed to update match {}", m.id))?;
        Ok(changed > 0)
    }

    fn delete_match(&self, id: &str) -> Result<bool> {
        let conn = self.conn();
        let changed = conn
            .execute("DELETE FROM matches WHERE id = ?1", params![id])
            .with_context(|| format!("failed to delete match {id}"))?;
        Ok(changed > 0)
    }

    fn load_players(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM players ORDER BY seq")
            .context("failed to prepare load_players query")?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .context("failed to query players")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("failed to map player rows")?;
        Ok(names)
    }

    /// Replace the roster in a single transaction.
    fn save_players(&self, names: &[String]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM players", [])
            .context("failed to clear players")?;
        for name in names {
            tx.execute("INSERT INTO players (name) VALUES (?1)", params![name])
                .with_context(|| format!("failed to insert player {name}"))?;
        }
        tx.commit().context("failed to commit save_players")?;
        Ok(())
    }
}
