// Configuration loading and parsing (config/club.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::roster::{normalize_name, Roster};

const CONFIG_FILE: &str = "club.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub club: ClubConfig,
    pub storage: StorageConfig,
    pub rules: RulesConfig,
}

// ---------------------------------------------------------------------------
// club.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire club.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ClubFile {
    club: ClubConfig,
    storage: StorageSection,
    #[serde(default)]
    rules: RulesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClubConfig {
    pub name: String,
    /// Registered on first run, while the stored roster is still empty.
    #[serde(default)]
    pub seed_players: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Csv,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
struct StorageSection {
    backend: StorageBackend,
    #[serde(default)]
    data_dir: Option<String>,
    #[serde(default = "default_db_file")]
    db_file: String,
}

fn default_db_file() -> String {
    "rally.db".to_string()
}

/// Where and how matches and players are persisted.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding `matches.csv` / `players.csv` or the SQLite file.
    pub data_dir: PathBuf,
    pub db_file: String,
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}

/// Checks applied to submitted matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// Only accept completed-set scores (6-0 .. 7-6) whose leader is the winner.
    #[serde(default = "enabled")]
    pub strict_scores: bool,
    /// Every participant must be on the roster.
    #[serde(default = "enabled")]
    pub require_registered: bool,
}

fn enabled() -> bool {
    true
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            strict_scores: true,
            require_registered: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/club.toml` relative to
/// `base_dir`. Relative storage paths are resolved against `base_dir`.
///
/// This does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let club_path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&club_path)?;
    parse_config(&text, &club_path, base_dir)
}

/// Parse club.toml contents. `path` is only used in error messages.
pub fn parse_config(text: &str, path: &Path, base_dir: &Path) -> Result<Config, ConfigError> {
    let file: ClubFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let data_dir = match file.storage.data_dir {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            if dir.is_absolute() {
                dir
            } else {
                base_dir.join(dir)
            }
        }
        None => default_data_dir(base_dir),
    };

    let config = Config {
        club: file.club,
        storage: StorageConfig {
            backend: file.storage.backend,
            data_dir,
            db_file: file.storage.db_file,
        },
        rules: file.rules,
    };

    validate(&config)?;

    Ok(config)
}

/// Platform data directory (e.g. `~/.local/share/rally`), falling back to
/// `<base_dir>/data` when no home directory can be determined.
fn default_data_dir(base_dir: &Path) -> PathBuf {
    directories::ProjectDirs::from("", "", "rally")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| base_dir.join("data"))
}

/// Create `config/club.toml` from `defaults/club.toml` on first run.
/// Returns the path written, or `None` when a config file already exists.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither {} nor {} found; run from the project root",
                target.display(),
                source.display()
            ),
        });
    }

    let copy_failed = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    };
    std::fs::create_dir_all(&config_dir).map_err(copy_failed)?;
    std::fs::copy(&source, &target).map_err(copy_failed)?;

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.club.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "club.name".into(),
            message: "must not be empty".into(),
        });
    }

    let mut seeds = Roster::default();
    for raw in &config.club.seed_players {
        if normalize_name(raw).is_empty() {
            return Err(ConfigError::ValidationError {
                field: "club.seed_players".into(),
                message: "names must not be empty".into(),
            });
        }
        if let Err(e) = seeds.add(raw) {
            return Err(ConfigError::ValidationError {
                field: "club.seed_players".into(),
                message: e.to_string(),
            });
        }
    }

    if config.storage.backend == StorageBackend::Sqlite && config.storage.db_file.trim().is_empty()
    {
        return Err(ConfigError::ValidationError {
            field: "storage.db_file".into(),
            message: "must not be empty for the sqlite backend".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
