// CSV-file backend: matches.csv and players.csv in one directory.
//
// Every mutation is a read-modify-write of the whole file, written to a
// temporary file and renamed into place. Concurrent writers: last write wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::{records_to_matches, MatchRecord, MatchStore, MATCH_COLUMNS};
use crate::model::Match;

const MATCHES_FILE: &str = "matches.csv";
const PLAYERS_FILE: &str = "players.csv";

pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Use `dir` for storage, creating it and empty files with headers if
    /// they do not exist yet.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let store = CsvStore {
            dir: dir.to_path_buf(),
        };
        if !store.matches_path().exists() {
            store.write_records(&[])?;
        }
        if !store.players_path().exists() {
            store.save_players(&[])?;
        }
        Ok(store)
    }

    pub fn matches_path(&self) -> PathBuf {
        self.dir.join(MATCHES_FILE)
    }

    pub fn players_path(&self) -> PathBuf {
        self.dir.join(PLAYERS_FILE)
    }

    /// Raw rows, including those that do not convert to a `Match`.
    pub fn read_records(&self) -> Result<Vec<MatchRecord>> {
        let path = self.matches_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        reader
            .deserialize::<MatchRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("failed to read match rows from {}", path.display()))
    }

    fn write_records(&self, records: &[MatchRecord]) -> Result<()> {
        let path = self.matches_path();
        write_atomically(&path, |writer| {
            writer.write_record(MATCH_COLUMNS)?;
            for record in records {
                writer.write_record(record.to_row())?;
            }
            Ok(())
        })?;
        debug!(rows = records.len(), "wrote {}", path.display());
        Ok(())
    }
}

/// Write a headerless CSV to `<path>.tmp`, then rename it over `path`.
fn write_atomically(
    path: &Path,
    fill: impl FnOnce(&mut csv::Writer<std::fs::File>) -> csv::Result<()>,
) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&tmp)
        .with_context(|| format!("failed to create {}", tmp.display()))?;
    fill(&mut writer).with_context(|| format!("failed to write {}", tmp.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", tmp.display()))?;
    drop(writer);
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

impl MatchStore for CsvStore {
    fn load_matches(&self) -> Result<Vec<Match>> {
        Ok(records_to_matches(&self.read_records()?))
    }

    /// Rows that could not be typed on load are dropped by a full save.
    fn save_matches(&self, matches: &[Match]) -> Result<()> {
        let records: Vec<MatchRecord> = matches.iter().map(MatchRecord::from).collect();
        self.write_records(&records)
    }

    fn append_match(&self, m: &Match) -> Result<()> {
        let mut records = self.read_records()?;
        if records.iter().any(|r| r.id == m.id) {
            anyhow::bail!("match id {} already exists", m.id);
        }
        records.push(MatchRecord::from(m));
        self.write_records(&records)
    }

    fn update_match(&self, m: &Match) -> Result<bool> {
        let mut records = self.read_records()?;
        let Some(slot) = records.iter_mut().find(|r| r.id == m.id) else {
            return Ok(false);
        };
        *slot = MatchRecord::from(m);
        self.write_records(&records)?;
        Ok(true)
    }

    fn delete_match(&self, id: &str) -> Result<bool> {
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&records)?;
        Ok(true)
    }

    fn load_players(&self) -> Result<Vec<String>> {
        let path = self.players_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut names = Vec::new();
        for row in reader.records() {
            let row = row.with_context(|| format!("failed to read {}", path.display()))?;
            if let Some(name) = row.get(0).filter(|n| !n.is_empty()) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn save_players(&self, names: &[String]) -> Result<()> {
        write_atomically(&self.players_path(), |writer| {
            writer.write_record(["name"])?;
            for name in names {
                writer.write_record([name])?;
            }
            Ok(())
        })
    }
}
