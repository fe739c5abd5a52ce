//! Identifier types for Riot accounts and matches.

use crate::error::{LolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for a Riot PUUID.
///
/// PUUIDs are opaque strings issued by Riot; this wrapper only keeps them from
/// being mixed up with match ids or display names.
///
/// # Examples
///
/// ```rust
/// use lol_stats::Puuid;
///
/// let puuid = Puuid::new("puuid-1");
/// assert_eq!(puuid.as_str(), "puuid-1");
/// assert_eq!(puuid.to_string(), "puuid-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Puuid(pub String);

impl Puuid {
    /// Create a new Puuid from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Puuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Puuid {
    type Err = LolError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.to_string()))
    }
}

/// A Riot ID in `NAME#TAG` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    pub fn new(game_name: impl Into<String>, tag_line: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            tag_line: tag_line.into(),
        }
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

impl FromStr for RiotId {
    type Err = LolError;

    fn from_str(s: &str) -> Result<Self> {
        // Game names may contain spaces but never '#'.
        let invalid = || LolError::InvalidRiotId {
            input: s.to_string(),
        };
        let (name, tag) = s.rsplit_once('#').ok_or_else(invalid)?;
        let (name, tag) = (name.trim(), tag.trim());
        if name.is_empty() || tag.is_empty() || name.contains('#') {
            return Err(invalid());
        }
        Ok(Self::new(name, tag))
    }
}
