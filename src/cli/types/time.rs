//! Calendar-year type used for year-to-date match retention.

use crate::error::{LolError, Result};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for a UTC calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameYear(pub i32);

impl GameYear {
    pub fn new(year: i32) -> Self {
        Self(year)
    }

    /// The current year according to the wall clock, in UTC.
    pub fn current() -> Self {
        Self(Utc::now().year())
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }

    pub fn previous(&self) -> Self {
        Self(self.0 - 1)
    }
}

impl Default for GameYear {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for GameYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameYear {
    type Err = LolError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.parse()?))
    }
}
