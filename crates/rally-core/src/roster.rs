// Club roster: the set of registered player names.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("{existing} is already on the roster")]
    Duplicate { existing: String },
}

/// Trim and collapse runs of inner whitespace to a single space.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Registered players in registration order.
///
/// Names are unique under case-insensitive comparison. The spelling used when
/// a player was first added is canonical; `resolve` maps any casing back to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster from stored names. Blank entries and later duplicates
    /// are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Roster::default();
        for name in names {
            let _ = roster.add(name.as_ref());
        }
        roster
    }

    /// Register a player. Returns the stored (normalized) name.
    pub fn add(&mut self, raw: &str) -> Result<&str, RosterError> {
        let name = normalize_name(raw);
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if let Some(existing) = self.resolve(&name) {
            return Err(RosterError::Duplicate {
                existing: existing.to_string(),
            });
        }
        self.names.push(name);
        Ok(self.names.last().map(String::as_str).unwrap_or_default())
    }

    /// Unregister a player. Matches recorded for them are unaffected.
    pub fn remove(&mut self, raw: &str) -> bool {
        let key = normalize_name(raw).to_lowercase();
        let before = self.names.len();
        self.names.retain(|n| n.to_lowercase() != key);
        self.names.len() != before
    }

    /// Canonical spelling for `raw`, if registered.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        let key = normalize_name(raw).to_lowercase();
        self.names
            .iter()
            .find(|n| n.to_lowercase() == key)
            .map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
