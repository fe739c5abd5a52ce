//! Unit tests for storage functionality

use super::*;
use crate::cli::types::{GameYear, Puuid};
use crate::error::LolError;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

const YEAR: GameYear = GameYear(2025);

fn create_test_db() -> MatchRepository {
    MatchRepository::open_in_memory().unwrap()
}

fn create_test_db_with_player() -> (MatchRepository, Puuid) {
    let mut db = create_test_db();
    let puuid = Puuid::new("puuid-1");
    db.register_player(&puuid, Some("Player"), Some("LAS"))
        .unwrap();
    (db, puuid)
}

fn build_match(match_id: &str, year: i32) -> RawMatch {
    let timestamp = Utc
        .with_ymd_and_hms(year, 1, 15, 0, 0, 0)
        .unwrap()
        .timestamp_millis();
    RawMatch::Payload(json!({
        "metadata": { "matchId": match_id },
        "info": { "gameStartTimestamp": timestamp },
    }))
}

fn count_rows(db: &MatchRepository, table: &str) -> i64 {
    db.conn()
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
}

#[test]
fn test_database_creation() {
    let db = create_test_db();
    assert!(!db.is_closed());
    assert_eq!(count_rows(&db, "players"), 0);
}

#[test]
fn test_schema_initialization_is_idempotent() {
    let (db, _) = create_test_db_with_player();
    db.initialize_schema().unwrap();
    db.initialize_schema().unwrap();
    assert_eq!(count_rows(&db, "players"), 1);
}

#[test]
fn test_register_player_merges_missing_fields() {
    let (mut db, puuid) = create_test_db_with_player();

    db.register_player(&puuid, None, Some("LAN")).unwrap();

    let player = db.get_player(&puuid).unwrap().unwrap();
    assert_eq!(player.game_name.as_deref(), Some("Player"));
    assert_eq!(player.tag_line.as_deref(), Some("LAN"));
    assert!(player.last_searched.is_some());
    assert_eq!(count_rows(&db, "players"), 1);
}

#[test]
fn test_get_player_missing() {
    let db = create_test_db();
    assert!(db.get_player(&Puuid::new("nobody")).unwrap().is_none());
}

#[test]
fn test_find_player_by_riot_id_ignores_case() {
    let (db, puuid) = create_test_db_with_player();

    let found = db.find_player_by_riot_id("player", "las").unwrap().unwrap();
    assert_eq!(found.puuid, puuid);
    assert!(db.find_player_by_riot_id("Player", "EUW").unwrap().is_none());
}

#[test]
fn test_store_matches_inserts_only_new_records() {
    let (mut db, puuid) = create_test_db_with_player();
    let matches = vec![
        build_match("match-current-1", 2025),
        build_match("match-current-2", 2025),
        build_match("match-previous", 2024),
    ];

    let inserted = db
        .store_matches_for_year(&puuid, &matches, None, YEAR)
        .unwrap();
    assert_eq!(inserted, vec!["match-current-1", "match-current-2"]);

    let inserted_again = db
        .store_matches_for_year(&puuid, &matches, None, YEAR)
        .unwrap();
    assert!(inserted_again.is_empty());

    assert_eq!(
        db.get_stored_match_ids(&puuid, Some(YEAR)).unwrap(),
        vec!["match-current-1", "match-current-2"]
    );
    assert!(db
        .get_stored_match_ids(&puuid, Some(YEAR.previous()))
        .unwrap()
        .is_empty());
}

#[test]
fn test_store_matches_partial_overlap_returns_only_new() {
    let (mut db, puuid) = create_test_db_with_player();
    db.store_matches_for_year(&puuid, &[build_match("m-1", 2025)], None, YEAR)
        .unwrap();

    let inserted = db
        .store_matches_for_year(
            &puuid,
            &[
                build_match("m-3", 2025),
                build_match("m-1", 2025),
                build_match("m-2", 2025),
            ],
            None,
            YEAR,
        )
        .unwrap();
    assert_eq!(inserted, vec!["m-3", "m-2"]);
    assert_eq!(db.get_match_count(&puuid).unwrap(), 3);
}

#[test]
fn test_store_matches_duplicate_ids_in_one_call() {
    let (mut db, puuid) = create_test_db_with_player();

    let inserted = db
        .store_matches_for_year(
            &puuid,
            &[build_match("dup", 2025), RawMatch::from("dup")],
            None,
            YEAR,
        )
        .unwrap();
    assert_eq!(inserted, vec!["dup"]);

    // The first occurrence wins, so the payload is kept.
    let stored = db.get_match("dup").unwrap().unwrap();
    assert!(stored.raw_json.is_some());
}

#[test]
fn test_match_is_kept_for_its_first_player_only() {
    let (mut db, first) = create_test_db_with_player();
    let second = Puuid::new("puuid-2");
    db.register_player(&second, Some("Teammate"), Some("LAS"))
        .unwrap();

    let shared = build_match("shared", 2025);
    let inserted = db
        .store_matches_for_year(&first, &[shared.clone()], None, YEAR)
        .unwrap();
    assert_eq!(inserted, vec!["shared"]);

    let inserted = db
        .store_matches_for_year(&second, &[shared], None, YEAR)
        .unwrap();
    assert!(inserted.is_empty());
    assert_eq!(db.get_match_count(&first).unwrap(), 1);
    assert_eq!(db.get_match_count(&second).unwrap(), 0);
    assert_eq!(count_rows(&db, "matches"), 1);
}

#[test]
fn test_store_matches_honors_string_timestamps() {
    let (mut db, puuid) = create_test_db_with_player();
    let items = [
        RawMatch::Payload(json!({
            "metadata": { "matchId": "LA1_2015" },
            "info": { "gameStartTimestamp": "1420070400000" }
        })),
        RawMatch::Payload(json!({
            "metadata": { "matchId": "LA1_overflow" },
            "info": { "gameStartTimestamp": 1e300 }
        })),
    ];

    let inserted = db.store_matches_for_year(&puuid, &items, None, YEAR).unwrap();
    assert!(inserted.is_empty());
    let inserted = db
        .store_matches_for_year(&puuid, &items, Some(YEAR), YEAR)
        .unwrap();
    assert!(inserted.is_empty());
    assert!(db.get_stored_match_ids(&puuid, None).unwrap().is_empty());
}

#[test]
fn test_store_matches_accepts_strings_with_default_year() {
    let (mut db, puuid) = create_test_db_with_player();

    let inserted = db
        .store_matches_for_year(&puuid, &[RawMatch::from("match-as-string")], Some(YEAR), YEAR)
        .unwrap();

    assert_eq!(inserted, vec!["match-as-string"]);
    let stored = db.get_stored_matches(&puuid, None, None, None).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].raw_json, None);
    assert!(stored[0].created_at.is_some());
}

#[test]
fn test_store_matches_empty_input_does_not_touch_store() {
    let mut db = create_test_db();
    // No registered player, but nothing survives normalization either.
    let inserted = db
        .store_matches_for_year(
            &Puuid::new("ghost"),
            &[build_match("old", 2020)],
            None,
            YEAR,
        )
        .unwrap();
    assert!(inserted.is_empty());
}

#[test]
fn test_store_matches_unregistered_player_rolls_back() {
    let (mut db, puuid) = create_test_db_with_player();
    db.store_matches_for_year(&puuid, &[build_match("kept", 2025)], None, YEAR)
        .unwrap();

    let result = db.store_matches_for_year(
        &Puuid::new("ghost"),
        &[build_match("orphan-1", 2025), build_match("orphan-2", 2025)],
        None,
        YEAR,
    );

    match result {
        Err(LolError::ReferentialIntegrity { puuid }) => assert_eq!(puuid, "ghost"),
        other => panic!("Expected ReferentialIntegrity, got {other:?}"),
    }
    assert_eq!(count_rows(&db, "matches"), 1);
}

#[test]
fn test_existence_check_spans_multiple_batches() {
    let (mut db, puuid) = create_test_db_with_player();
    let total = EXISTENCE_CHECK_BATCH_SIZE * 2 + 7;
    let ids: Vec<RawMatch> = (0..total)
        .map(|i| RawMatch::from(format!("LA1_{:05}", i)))
        .collect();

    let first = db
        .store_matches_for_year(&puuid, &ids, Some(YEAR), YEAR)
        .unwrap();
    assert_eq!(first.len(), total);

    let second = db
        .store_matches_for_year(&puuid, &ids, Some(YEAR), YEAR)
        .unwrap();
    assert!(second.is_empty());
    assert_eq!(db.get_match_count(&puuid).unwrap(), total as u64);
}

#[test]
fn test_filter_unknown_match_ids() {
    let (mut db, puuid) = create_test_db_with_player();
    db.store_matches_for_year(&puuid, &[RawMatch::from("known")], Some(YEAR), YEAR)
        .unwrap();

    let candidates = vec!["new-b".to_string(), "known".to_string(), "new-a".to_string()];
    assert_eq!(
        db.filter_unknown_match_ids(&candidates).unwrap(),
        vec!["new-b", "new-a"]
    );
    assert!(db.filter_unknown_match_ids(&[]).unwrap().is_empty());
}

#[test]
fn test_stored_match_ordering() {
    let (mut db, puuid) = create_test_db_with_player();
    let ids = ["LA1_2", "LA1_3", "LA1_1"].map(RawMatch::from);
    db.store_matches_for_year(&puuid, &ids, Some(YEAR), YEAR)
        .unwrap();

    assert_eq!(
        db.get_stored_match_ids(&puuid, None).unwrap(),
        vec!["LA1_1", "LA1_2", "LA1_3"]
    );
    let newest_first: Vec<String> = db
        .get_stored_matches(&puuid, None, None, None)
        .unwrap()
        .into_iter()
        .map(|m| m.match_id)
        .collect();
    assert_eq!(newest_first, vec!["LA1_3", "LA1_2", "LA1_1"]);
    assert_eq!(
        db.iter_stored_match_ids(&puuid, Some(YEAR))
            .unwrap()
            .collect::<Vec<_>>(),
        vec!["LA1_1", "LA1_2", "LA1_3"]
    );
}

#[test]
fn test_pagination_covers_every_match_once() {
    let (mut db, puuid) = create_test_db_with_player();
    let ids: Vec<RawMatch> = (0..23).map(|i| RawMatch::from(format!("LA1_{:03}", i))).collect();
    db.store_matches_for_year(&puuid, &ids, Some(YEAR), YEAR)
        .unwrap();

    let page_size = 5;
    let total = db.get_match_count(&puuid).unwrap() as u32;
    let mut seen = Vec::new();
    let mut offset = 0;
    while offset < total {
        let page = db
            .get_stored_matches(&puuid, None, Some(page_size), Some(offset))
            .unwrap();
        assert!(page.len() <= page_size as usize);
        seen.extend(page.into_iter().map(|m| m.match_id));
        offset += page_size;
    }

    let mut expected: Vec<String> = (0..23).map(|i| format!("LA1_{:03}", i)).collect();
    expected.reverse();
    assert_eq!(seen, expected);
}

#[test]
fn test_get_stored_matches_offset_without_limit() {
    let (mut db, puuid) = create_test_db_with_player();
    let ids = ["a", "b", "c"].map(RawMatch::from);
    db.store_matches_for_year(&puuid, &ids, Some(YEAR), YEAR)
        .unwrap();

    let rest: Vec<String> = db
        .get_stored_matches(&puuid, None, None, Some(1))
        .unwrap()
        .into_iter()
        .map(|m| m.match_id)
        .collect();
    assert_eq!(rest, vec!["b", "a"]);
}

#[test]
fn test_stored_payload_round_trips() {
    let (mut db, puuid) = create_test_db_with_player();
    db.store_matches_for_year(&puuid, &[build_match("LA1_9", 2025)], None, YEAR)
        .unwrap();

    let record = db.get_match("LA1_9").unwrap().unwrap();
    let payload: Value = record.payload().unwrap().unwrap();
    assert_eq!(payload["metadata"]["matchId"], "LA1_9");
    assert_eq!(record.game_year, YEAR);
    assert!(db.get_match("missing").unwrap().is_none());
}

#[test]
fn test_timeline_is_immutable_once_stored() {
    let (mut db, puuid) = create_test_db_with_player();
    db.store_matches_for_year(&puuid, &[RawMatch::from("LA1_1")], Some(YEAR), YEAR)
        .unwrap();

    let first = json!({ "info": { "frames": [1] } });
    let second = json!({ "info": { "frames": [2] } });

    assert!(db.store_match_timeline("LA1_1", &first).unwrap());
    assert!(!db.store_match_timeline("LA1_1", &second).unwrap());
    assert_eq!(db.get_match_timeline("LA1_1").unwrap(), Some(first.clone()));

    // Cached copy and stored copy agree.
    db.timelines.clear();
    assert_eq!(db.get_match_timeline("LA1_1").unwrap(), Some(first));
}

#[test]
fn test_timeline_missing() {
    let db = create_test_db();
    assert!(db.get_match_timeline("LA1_404").unwrap().is_none());
}

#[test]
fn test_timeline_for_unknown_match_is_rejected() {
    let mut db = create_test_db();
    match db.store_match_timeline("LA1_404", &json!({})) {
        Err(LolError::UnknownMatch { match_id }) => assert_eq!(match_id, "LA1_404"),
        other => panic!("Expected UnknownMatch, got {other:?}"),
    }
}

#[test]
fn test_operations_after_close_fail() {
    let (mut db, puuid) = create_test_db_with_player();
    db.close().unwrap();
    assert!(db.is_closed());

    assert!(matches!(
        db.register_player(&puuid, None, None),
        Err(LolError::ClosedResource)
    ));
    assert!(matches!(
        db.store_matches_for_year(&puuid, &[RawMatch::from("x")], Some(YEAR), YEAR),
        Err(LolError::ClosedResource)
    ));
    assert!(matches!(
        db.get_stored_match_ids(&puuid, None),
        Err(LolError::ClosedResource)
    ));
    assert!(matches!(
        db.get_match_timeline("x"),
        Err(LolError::ClosedResource)
    ));

    // Closing again is fine.
    db.close().unwrap();
}

#[test]
fn test_store_matches_after_close_fails_even_when_nothing_survives() {
    let (mut db, puuid) = create_test_db_with_player();
    db.close().unwrap();
    let result = db.store_matches_for_year(&puuid, &[build_match("old", 2020)], None, YEAR);
    assert!(matches!(result, Err(LolError::ClosedResource)));
}
