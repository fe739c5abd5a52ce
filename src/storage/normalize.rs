//! Normalization of raw match payloads into storable records.
//!
//! Match payloads arrive either as full Match-V5 objects or as bare match ids.
//! [`normalize`] turns both into [`MatchRecord`]s with a resolved year and
//! keeps only the records that fall in the current year.

use chrono::{DateTime, Datelike};
use serde_json::Value;

use super::models::{MatchRecord, RawMatch};
use crate::cli::types::GameYear;
use crate::error::{LolError, Result};

/// Raw timestamps above this value are milliseconds; at or below, seconds.
pub const MILLIS_THRESHOLD: f64 = 1e10;

/// Convert a raw epoch timestamp into a UTC calendar year.
///
/// Returns `None` when the value is not finite or falls outside the range
/// chrono can represent.
pub fn year_from_timestamp(raw: f64) -> Option<GameYear> {
    if !raw.is_finite() {
        return None;
    }
    let seconds = if raw > MILLIS_THRESHOLD {
        raw / 1000.0
    } else {
        raw
    };

    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        .map(|dt| GameYear::new(dt.year()))
}

/// A timestamp field read from a payload.
enum Timestamp {
    /// Missing, null, zero or an empty string.
    Absent,
    Raw(f64),
    /// Present but neither a number nor a numeric string.
    Invalid,
}

fn timestamp_field(value: Option<&Value>) -> Timestamp {
    let raw = match value {
        None | Some(Value::Null) => return Timestamp::Absent,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Timestamp::Absent,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match raw {
        Some(v) if v == 0.0 => Timestamp::Absent,
        Some(v) => Timestamp::Raw(v),
        None => Timestamp::Invalid,
    }
}

/// Derive the year a match was played from its payload.
///
/// Looks at `info.gameStartTimestamp`, then `info.gameCreation`, then a
/// top-level `gameStartTimestamp`; the first present field wins. Returns
/// `Ok(None)` when none of them is present and
/// [`LolError::MalformedRecord`] when the winning field cannot be read as a
/// year.
pub fn year_from_match(payload: &Value) -> Result<Option<GameYear>> {
    let info = payload.get("info").filter(|i| i.is_object());
    let candidates = [
        info.and_then(|i| i.get("gameStartTimestamp")),
        info.and_then(|i| i.get("gameCreation")),
        payload.get("gameStartTimestamp"),
    ];

    for value in candidates {
        match timestamp_field(value) {
            Timestamp::Absent => continue,
            Timestamp::Raw(raw) => {
                return year_from_timestamp(raw)
                    .map(Some)
                    .ok_or(LolError::MalformedRecord)
            }
            Timestamp::Invalid => return Err(LolError::MalformedRecord),
        }
    }
    Ok(None)
}

fn id_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract the match id from a payload: `metadata.matchId`, then `matchId`,
/// then `id`.
pub fn match_id_from_payload(payload: &Value) -> Option<String> {
    id_field(payload.get("metadata").and_then(|m| m.get("matchId")))
        .or_else(|| id_field(payload.get("matchId")))
        .or_else(|| id_field(payload.get("id")))
}

/// Id, serialized payload and derived year of one raw item.
///
/// Fails with [`LolError::MalformedRecord`] when no id can be found or when
/// a timestamp is present but unusable.
fn identify(item: &RawMatch) -> Result<(String, Option<String>, Option<GameYear>)> {
    match item {
        RawMatch::Payload(payload) => {
            let id = match_id_from_payload(payload).ok_or(LolError::MalformedRecord)?;
            let year = year_from_match(payload)?;
            Ok((id, Some(payload.to_string()), year))
        }
        RawMatch::Id(id) if !id.is_empty() => Ok((id.clone(), None, None)),
        RawMatch::Id(_) => Err(LolError::MalformedRecord),
    }
}

/// Turn raw match items into records for `current_year`.
///
/// Items without an id, or with a timestamp that cannot be read as a year,
/// are dropped. Items carrying no timestamp at all use `default_year`, or
/// `current_year` when that is absent. Only records whose
/// year equals `current_year` are returned, in input order.
pub fn normalize(
    raw_items: &[RawMatch],
    default_year: Option<GameYear>,
    current_year: GameYear,
) -> Vec<MatchRecord> {
    let fallback_year = default_year.unwrap_or(current_year);
    let mut records = Vec::with_capacity(raw_items.len());

    for item in raw_items {
        let (match_id, raw_json, year) = match identify(item) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::debug!(error = %e, "skipping match");
                continue;
            }
        };

        let game_year = year.unwrap_or(fallback_year);
        if game_year != current_year {
            tracing::debug!(
                %match_id,
                %game_year,
                %current_year,
                "skipping out-of-year match"
            );
            continue;
        }

        records.push(MatchRecord::new(match_id, game_year, raw_json));
    }

    records
}
