//! Data models for the storage layer

use crate::cli::types::{GameYear, Puuid};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Player information stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub puuid: Puuid,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
    pub last_searched: Option<String>,
}

impl PlayerInfo {
    /// `NAME#TAG` when both parts are known, otherwise whichever part exists.
    pub fn display_name(&self) -> Option<String> {
        match (&self.game_name, &self.tag_line) {
            (Some(name), Some(tag)) => Some(format!("{}#{}", name, tag)),
            (Some(name), None) => Some(name.clone()),
            _ => None,
        }
    }
}

/// A match kept for one player.
///
/// `created_at` is assigned by the store and is `None` until the record has
/// been read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub game_year: GameYear,
    pub raw_json: Option<String>,
    pub created_at: Option<String>,
}

impl MatchRecord {
    pub fn new(match_id: impl Into<String>, game_year: GameYear, raw_json: Option<String>) -> Self {
        Self {
            match_id: match_id.into(),
            game_year,
            raw_json,
            created_at: None,
        }
    }

    /// Parse the stored payload, if there is one.
    pub fn payload(&self) -> crate::Result<Option<Value>> {
        self.raw_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }
}

/// A match as handed over by a collaborator: either the full match payload or
/// only its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMatch {
    Id(String),
    Payload(Value),
}

impl From<Value> for RawMatch {
    fn from(value: Value) -> Self {
        match value {
            Value::String(id) => RawMatch::Id(id),
            other => RawMatch::Payload(other),
        }
    }
}

impl From<String> for RawMatch {
    fn from(id: String) -> Self {
        RawMatch::Id(id)
    }
}

impl From<&str> for RawMatch {
    fn from(id: &str) -> Self {
        RawMatch::Id(id.to_string())
    }
}
