//! Database schema and connection management

use crate::core::cache::TimelineCache;
use crate::error::{LolError, Result};
use rusqlite::Connection;
use std::path::Path;

/// Default location of the match database, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/processed/lol_matches.db";

/// Number of in-memory timeline payloads kept by a repository
const TIMELINE_CACHE_CAPACITY: usize = 32;

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS players (
    puuid TEXT PRIMARY KEY,
    game_name TEXT,
    tag_line TEXT,
    last_searched TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS matches (
    match_id TEXT NOT NULL,
    puuid TEXT NOT NULL,
    game_year INTEGER NOT NULL,
    raw_json TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (puuid) REFERENCES players(puuid),
    PRIMARY KEY (match_id, puuid)
);

CREATE INDEX IF NOT EXISTS idx_matches_puuid_year
    ON matches (puuid, game_year);

-- Parent key for match_timelines; existence checks are global on match_id.
-- This makes match_id alone the effective key of matches: a match stored for
-- one participant is never stored again for a second one.
CREATE UNIQUE INDEX IF NOT EXISTS idx_matches_match_id
    ON matches (match_id);

CREATE TABLE IF NOT EXISTS match_timelines (
    match_id TEXT PRIMARY KEY,
    timeline_json TEXT NOT NULL,
    FOREIGN KEY (match_id) REFERENCES matches(match_id)
);
";

/// Local match store for players, matches and timelines.
///
/// Owns a single SQLite connection. The connection is released when the
/// repository is dropped or [`MatchRepository::close`] is called; every
/// operation after `close` fails with [`LolError::ClosedResource`].
pub struct MatchRepository {
    conn: Option<Connection>,
    pub(crate) timelines: TimelineCache,
}

impl MatchRepository {
    /// Open the database at `path`, creating parent directories and tables as needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::debug!(path = %path.display(), "opening match database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a throwaway in-memory database, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let repo = Self {
            conn: Some(conn),
            timelines: TimelineCache::new(TIMELINE_CACHE_CAPACITY),
        };
        repo.initialize_schema()?;
        Ok(repo)
    }

    /// Enable foreign keys and create any missing tables and indexes
    pub(crate) fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Release the underlying connection. Calling this twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.timelines.clear();
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| LolError::Storage(err))?;
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Active connection, or `ClosedResource` after [`close`](Self::close)
    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(LolError::ClosedResource)
    }

    pub(crate) fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(LolError::ClosedResource)
    }
}
