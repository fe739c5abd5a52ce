//! Repository operations: player registration, deduplicated match ingestion,
//! paginated read-back and the timeline cache.

use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::Value;

use super::{
    models::{MatchRecord, PlayerInfo, RawMatch},
    normalize::normalize,
    schema::MatchRepository,
};
use crate::cli::types::{GameYear, Puuid};
use crate::error::{LolError, Result};

/// Ids per existence-check query, well under SQLite's 999 parameter limit
pub const EXISTENCE_CHECK_BATCH_SIZE: usize = 500;

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Return the subset of `candidates` already present in `matches`.
fn existing_match_ids(conn: &Connection, candidates: &[&str]) -> Result<HashSet<String>> {
    let mut existing = HashSet::new();

    for batch in candidates.chunks(EXISTENCE_CHECK_BATCH_SIZE) {
        // Placeholders come from the batch length, never from input.
        let placeholders = vec!["?"; batch.len()].join(",");
        let sql = format!(
            "SELECT match_id FROM matches WHERE match_id IN ({})",
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(batch.iter()), |row| row.get::<_, String>(0))?;
        for row in rows {
            existing.insert(row?);
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        batches = candidates.len().div_ceil(EXISTENCE_CHECK_BATCH_SIZE),
        existing = existing.len(),
        "checked match existence"
    );
    Ok(existing)
}

fn row_to_match_record(row: &Row) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        match_id: row.get(0)?,
        game_year: GameYear::new(row.get(1)?),
        raw_json: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_player(row: &Row) -> rusqlite::Result<PlayerInfo> {
    Ok(PlayerInfo {
        puuid: Puuid::new(row.get::<_, String>(0)?),
        game_name: row.get(1)?,
        tag_line: row.get(2)?,
        last_searched: row.get(3)?,
    })
}

impl MatchRepository {
    /// Insert a player or refresh an existing one.
    ///
    /// Absent name/tag values keep what is already stored; `last_searched`
    /// is always set to now.
    pub fn register_player(
        &mut self,
        puuid: &Puuid,
        game_name: Option<&str>,
        tag_line: Option<&str>,
    ) -> Result<()> {
        let timestamp = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO players (puuid, game_name, tag_line, last_searched)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(puuid) DO UPDATE SET
                 game_name = COALESCE(excluded.game_name, players.game_name),
                 tag_line = COALESCE(excluded.tag_line, players.tag_line),
                 last_searched = excluded.last_searched",
            params![puuid.as_str(), game_name, tag_line, timestamp],
        )?;
        tracing::debug!(%puuid, "registered player");
        Ok(())
    }

    /// Store the current-year matches in `raw_items` that are not stored yet.
    ///
    /// Returns the ids that were inserted, in input order.
    pub fn store_matches(
        &mut self,
        puuid: &Puuid,
        raw_items: &[RawMatch],
        default_year: Option<GameYear>,
    ) -> Result<Vec<String>> {
        self.store_matches_for_year(puuid, raw_items, default_year, GameYear::current())
    }

    /// [`store_matches`](Self::store_matches) with an explicit current year.
    pub fn store_matches_for_year(
        &mut self,
        puuid: &Puuid,
        raw_items: &[RawMatch],
        default_year: Option<GameYear>,
        current_year: GameYear,
    ) -> Result<Vec<String>> {
        self.conn()?;
        let records = normalize(raw_items, default_year, current_year);
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn_mut()?;
        let candidates: Vec<&str> = records.iter().map(|r| r.match_id.as_str()).collect();
        let mut known = existing_match_ids(conn, &candidates)?;

        let pending: Vec<&MatchRecord> = records
            .iter()
            .filter(|r| known.insert(r.match_id.clone()))
            .collect();
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let tx = conn.transaction()?;
        let mut inserted = Vec::with_capacity(pending.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO matches (match_id, puuid, game_year, raw_json)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in pending {
                stmt.execute(params![
                    record.match_id,
                    puuid.as_str(),
                    record.game_year.as_i32(),
                    record.raw_json
                ])
                .map_err(|err| {
                    if is_foreign_key_violation(&err) {
                        LolError::ReferentialIntegrity {
                            puuid: puuid.to_string(),
                        }
                    } else {
                        LolError::Storage(err)
                    }
                })?;
                inserted.push(record.match_id.clone());
            }
        }
        tx.commit()?;

        tracing::info!(%puuid, inserted = inserted.len(), "stored new matches");
        Ok(inserted)
    }

    /// Return the candidate ids that are not stored for any player, in input order.
    pub fn filter_unknown_match_ids(&self, candidates: &[String]) -> Result<Vec<String>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
        let known = existing_match_ids(self.conn()?, &refs)?;
        Ok(candidates
            .iter()
            .filter(|id| !known.contains(id.as_str()))
            .cloned()
            .collect())
    }

    /// Stored match ids for a player, ascending
    pub fn get_stored_match_ids(
        &self,
        puuid: &Puuid,
        year: Option<GameYear>,
    ) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT match_id FROM matches
             WHERE puuid = ?1 AND (?2 IS NULL OR game_year = ?2)
             ORDER BY match_id ASC",
        )?;
        let rows = stmt.query_map(params![puuid.as_str(), year.map(|y| y.as_i32())], |row| {
            row.get(0)
        })?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// Iterate over stored match ids for a player, ascending
    pub fn iter_stored_match_ids(
        &self,
        puuid: &Puuid,
        year: Option<GameYear>,
    ) -> Result<impl Iterator<Item = String>> {
        Ok(self.get_stored_match_ids(puuid, year)?.into_iter())
    }

    /// Stored matches for a player, most recent id first, with optional pagination
    pub fn get_stored_matches(
        &self,
        puuid: &Puuid,
        year: Option<GameYear>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<MatchRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT match_id, game_year, raw_json, created_at FROM matches
             WHERE puuid = ?1 AND (?2 IS NULL OR game_year = ?2)
             ORDER BY match_id DESC
             LIMIT ?3 OFFSET ?4",
        )?;

        // A negative LIMIT means no limit in SQLite.
        let limit = limit.map(i64::from).unwrap_or(-1);
        let offset = offset.map(i64::from).unwrap_or(0);
        let rows = stmt.query_map(
            params![puuid.as_str(), year.map(|y| y.as_i32()), limit, offset],
            row_to_match_record,
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Point lookup of a stored match by id
    pub fn get_match(&self, match_id: &str) -> Result<Option<MatchRecord>> {
        let record = self
            .conn()?
            .query_row(
                "SELECT match_id, game_year, raw_json, created_at FROM matches
                 WHERE match_id = ?1 LIMIT 1",
                params![match_id],
                row_to_match_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Total number of stored matches for a player
    pub fn get_match_count(&self, puuid: &Puuid) -> Result<u64> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM matches WHERE puuid = ?1",
            params![puuid.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    pub fn get_player(&self, puuid: &Puuid) -> Result<Option<PlayerInfo>> {
        let player = self
            .conn()?
            .query_row(
                "SELECT puuid, game_name, tag_line, last_searched FROM players
                 WHERE puuid = ?1 LIMIT 1",
                params![puuid.as_str()],
                row_to_player,
            )
            .optional()?;
        Ok(player)
    }

    /// Find a registered player by Riot ID, ignoring ASCII case
    pub fn find_player_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Option<PlayerInfo>> {
        let player = self
            .conn()?
            .query_row(
                "SELECT puuid, game_name, tag_line, last_searched FROM players
                 WHERE game_name = ?1 COLLATE NOCASE AND tag_line = ?2 COLLATE NOCASE
                 ORDER BY last_searched DESC
                 LIMIT 1",
                params![game_name, tag_line],
                row_to_player,
            )
            .optional()?;
        Ok(player)
    }

    /// Cache a timeline. An existing timeline for the match is left untouched.
    ///
    /// Returns true when a row was written.
    pub fn store_match_timeline(&mut self, match_id: &str, timeline: &Value) -> Result<bool> {
        let timeline_json = serde_json::to_string(timeline)?;
        let rows = self
            .conn()?
            .execute(
                "INSERT INTO match_timelines (match_id, timeline_json)
                 VALUES (?1, ?2)
                 ON CONFLICT(match_id) DO NOTHING",
                params![match_id, timeline_json],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    LolError::UnknownMatch {
                        match_id: match_id.to_string(),
                    }
                } else {
                    LolError::Storage(err)
                }
            })?;

        if rows == 0 {
            tracing::debug!(%match_id, "timeline already cached");
        }
        Ok(rows > 0)
    }

    /// Cached timeline for a match, if one was stored
    pub fn get_match_timeline(&self, match_id: &str) -> Result<Option<Value>> {
        let conn = self.conn()?;
        if let Some(timeline) = self.timelines.get(match_id) {
            return Ok(Some(timeline));
        }

        let stored: Option<String> = conn
            .query_row(
                "SELECT timeline_json FROM match_timelines WHERE match_id = ?1 LIMIT 1",
                params![match_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = stored.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let timeline: Value = serde_json::from_str(&json)?;
        self.timelines.put(match_id, timeline.clone());
        Ok(Some(timeline))
    }
}
