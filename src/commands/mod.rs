//! Command implementations for the League of Legends stats CLI

pub mod champions;
pub mod lookup;
pub mod mastery;
pub mod match_history;
pub mod player_stats;
pub mod sync_matches;
pub mod timeline;


use std::{ffi::OsString, path::PathBuf};

use crate::{
    cli::PlayerArgs,
    riot::{
        load_cached_champion_names, load_or_fetch_champion_names, ChampionNames, RiotClient,
        RiotSettings,
    },
    storage::{MatchRepository, PlayerInfo, DEFAULT_DB_PATH},
    LolError, Result, API_KEY_ENV_VAR, DB_PATH_ENV_VAR, DEFAULT_LOCALE, DEFAULT_PLATFORM,
    DEFAULT_REGION, PLATFORM_ENV_VAR, REGION_ENV_VAR,
};

/// Riot API key from `RIOT_API_KEY`
pub fn resolve_api_key() -> Result<String> {
    api_key_from(std::env::var(API_KEY_ENV_VAR).ok())
}

pub(crate) fn api_key_from(value: Option<String>) -> Result<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LolError::MissingApiKey {
            env_var: API_KEY_ENV_VAR.to_string(),
        })
}

/// Database path: `--db` flag, then `LOL_STATS_DB`, then the default location
pub fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    db_path_from(flag, std::env::var_os(DB_PATH_ENV_VAR))
}

pub(crate) fn db_path_from(flag: Option<PathBuf>, env_value: Option<OsString>) -> PathBuf {
    flag.or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}

/// Client settings from the environment. Fails only when the API key is missing.
pub fn resolve_settings() -> Result<RiotSettings> {
    settings_from(
        std::env::var(API_KEY_ENV_VAR).ok(),
        std::env::var(REGION_ENV_VAR).ok(),
        std::env::var(PLATFORM_ENV_VAR).ok(),
    )
}

pub(crate) fn settings_from(
    api_key: Option<String>,
    region: Option<String>,
    platform: Option<String>,
) -> Result<RiotSettings> {
    let non_empty = |v: Option<String>, default: &str| {
        v.map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    Ok(RiotSettings {
        api_key: api_key_from(api_key)?,
        region: non_empty(region, DEFAULT_REGION),
        platform: non_empty(platform, DEFAULT_PLATFORM),
        locale: DEFAULT_LOCALE.to_string(),
    })
}

/// Open the match store at the resolved path
pub fn open_repository(flag: Option<PathBuf>) -> Result<MatchRepository> {
    let path = resolve_db_path(flag);
    tracing::debug!(path = %path.display(), "opening match store");
    MatchRepository::open(path)
}

/// Build a client from the environment
pub fn riot_client() -> Result<RiotClient> {
    RiotClient::new(&resolve_settings()?)
}

/// Find the player a command is about.
///
/// A PUUID is used as given. A Riot ID is looked up in the store first and only
/// resolved through the API (and registered) when unknown locally.
pub async fn resolve_player(
    repo: &mut MatchRepository,
    client: Option<&RiotClient>,
    player: &PlayerArgs,
) -> Result<PlayerInfo> {
    match (&player.puuid, &player.riot_id) {
        (Some(puuid), _) => Ok(repo.get_player(puuid)?.unwrap_or_else(|| PlayerInfo {
            puuid: puuid.clone(),
            game_name: None,
            tag_line: None,
            last_searched: None,
        })),
        (None, Some(riot_id)) => {
            let stored = repo.find_player_by_riot_id(&riot_id.game_name, &riot_id.tag_line)?;
            if let Some(info) = stored {
                tracing::debug!(%riot_id, puuid = %info.puuid, "player found in store");
                return Ok(info);
            }

            let client = client.ok_or_else(|| LolError::PlayerNotFound {
                name: riot_id.to_string(),
            })?;
            let account = client
                .account_by_riot_id(&riot_id.game_name, &riot_id.tag_line)
                .await?;
            let game_name = account.game_name.as_deref().unwrap_or(&riot_id.game_name);
            let tag_line = account.tag_line.as_deref().unwrap_or(&riot_id.tag_line);
            repo.register_player(&account.puuid, Some(game_name), Some(tag_line))?;

            repo.get_player(&account.puuid)?
                .ok_or_else(|| LolError::PlayerNotFound {
                    name: riot_id.to_string(),
                })
        }
        (None, None) => Err(LolError::InvalidRiotId {
            input: String::new(),
        }),
    }
}

/// Champion names for display: the cached table, fetched when a client is
/// available. Missing names render as `ID:<id>`.
pub async fn champion_names(client: Option<&RiotClient>) -> ChampionNames {
    match client {
        Some(client) => match load_or_fetch_champion_names(client, false).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "could not load champion names");
                ChampionNames::default()
            }
        },
        None => load_cached_champion_names(DEFAULT_LOCALE).unwrap_or_default(),
    }
}
