//! Integration tests for the on-disk match store

use chrono::{TimeZone, Utc};
use lol_stats::{storage::*, GameYear, LolError, Puuid};
use serde_json::{json, Value};
use tempfile::TempDir;

const CURRENT: GameYear = GameYear(2025);

fn millis(year: i32) -> i64 {
    Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn raw_match(match_id: &str, year: i32) -> RawMatch {
    RawMatch::from(json!({
        "metadata": { "matchId": match_id },
        "info": { "gameStartTimestamp": millis(year) }
    }))
}

fn open_store(dir: &TempDir) -> MatchRepository {
    MatchRepository::open(dir.path().join("nested").join("lol_matches.db")).unwrap()
}

#[test]
fn test_year_scoped_dedup_scenario() {
    let dir = TempDir::new().unwrap();
    let mut repo = open_store(&dir);
    let puuid = Puuid::new("puuid-1");
    repo.register_player(&puuid, Some("El Jods"), Some("LAN")).unwrap();

    let batch = vec![
        raw_match("LA1_100", 2025),
        raw_match("LA1_101", 2025),
        raw_match("LA1_099", 2024),
    ];

    let inserted = repo
        .store_matches_for_year(&puuid, &batch, None, CURRENT)
        .unwrap();
    assert_eq!(inserted, vec!["LA1_100".to_string(), "LA1_101".to_string()]);

    let again = repo
        .store_matches_for_year(&puuid, &batch, None, CURRENT)
        .unwrap();
    assert!(again.is_empty());

    assert!(repo
        .get_stored_match_ids(&puuid, Some(CURRENT.previous()))
        .unwrap()
        .is_empty());
    assert_eq!(
        repo.get_stored_match_ids(&puuid, None).unwrap(),
        vec!["LA1_100".to_string(), "LA1_101".to_string()]
    );
}

#[test]
fn test_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let puuid = Puuid::new("puuid-1");

    {
        let mut repo = open_store(&dir);
        repo.register_player(&puuid, Some("El Jods"), Some("LAN")).unwrap();
        repo.store_matches_for_year(&puuid, &[raw_match("LA1_1", 2025)], None, CURRENT)
            .unwrap();
        repo.store_match_timeline("LA1_1", &json!({ "info": { "frames": [] } }))
            .unwrap();
        repo.close().unwrap();
    }

    let mut repo = open_store(&dir);
    assert_eq!(repo.get_match_count(&puuid).unwrap(), 1);
    assert!(repo.get_match_timeline("LA1_1").unwrap().is_some());
    let player = repo.get_player(&puuid).unwrap().unwrap();
    assert_eq!(player.display_name().as_deref(), Some("El Jods#LAN"));

    // Stored ids are still known after reopening.
    let inserted = repo
        .store_matches_for_year(&puuid, &[raw_match("LA1_1", 2025)], None, CURRENT)
        .unwrap();
    assert!(inserted.is_empty());
}

#[test]
fn test_unregistered_player_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut repo = open_store(&dir);

    let err = repo
        .store_matches_for_year(
            &Puuid::new("ghost"),
            &[raw_match("LA1_1", 2025)],
            None,
            CURRENT,
        )
        .unwrap_err();
    assert!(matches!(err, LolError::ReferentialIntegrity { .. }));
    assert!(repo.get_match("LA1_1").unwrap().is_none());
}

#[test]
fn test_bare_ids_and_payload_read_back() {
    let dir = TempDir::new().unwrap();
    let mut repo = open_store(&dir);
    let puuid = Puuid::new("puuid-1");
    repo.register_player(&puuid, None, None).unwrap();

    let items = vec![
        RawMatch::from("LA1_BARE"),
        raw_match("LA1_FULL", 2025),
        RawMatch::from(json!({ "info": { "gameStartTimestamp": millis(2025) } })),
    ];
    let inserted = repo
        .store_matches_for_year(&puuid, &items, Some(CURRENT), CURRENT)
        .unwrap();
    assert_eq!(inserted, vec!["LA1_BARE".to_string(), "LA1_FULL".to_string()]);

    let bare = repo.get_match("LA1_BARE").unwrap().unwrap();
    assert_eq!(bare.raw_json, None);
    assert!(bare.created_at.is_some());

    let full = repo.get_match("LA1_FULL").unwrap().unwrap();
    let payload: Value = full.payload().unwrap().unwrap();
    assert_eq!(payload["metadata"]["matchId"], "LA1_FULL");
}

#[test]
fn test_closed_store_rejects_everything() {
    let dir = TempDir::new().unwrap();
    let mut repo = open_store(&dir);
    repo.close().unwrap();
    repo.close().unwrap();

    assert!(repo.is_closed());
    assert!(matches!(
        repo.get_match_count(&Puuid::new("puuid-1")),
        Err(LolError::ClosedResource)
    ));
    assert!(matches!(
        repo.register_player(&Puuid::new("puuid-1"), None, None),
        Err(LolError::ClosedResource)
    ));
}
