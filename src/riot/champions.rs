//! Champion name table backed by a JSON file in the user cache directory.

use std::path::Path;

use crate::core::{champion_data_path, try_read_to_string, write_string};
use crate::riot::{http::RiotClient, types::ChampionNames};
use crate::Result;

/// Load the champion table from the file cache. If missing, unreadable or
/// `refresh == true`, fetch it from Data Dragon and rewrite the cache.
pub async fn load_or_fetch_champion_names(
    client: &RiotClient,
    refresh: bool,
) -> Result<ChampionNames> {
    let path = champion_data_path(client.locale());
    load_or_fetch_champion_names_at(client, &path, refresh).await
}

/// Champion table from the file cache only, for commands that run offline
pub fn load_cached_champion_names(locale: &str) -> Option<ChampionNames> {
    let s = try_read_to_string(&champion_data_path(locale))?;
    serde_json::from_str::<ChampionNames>(&s)
        .ok()
        .filter(|names| !names.is_empty())
}

/// [`load_or_fetch_champion_names`] with an explicit cache file
pub async fn load_or_fetch_champion_names_at(
    client: &RiotClient,
    path: &Path,
    refresh: bool,
) -> Result<ChampionNames> {
    if !refresh {
        if let Some(s) = try_read_to_string(path) {
            match serde_json::from_str::<ChampionNames>(&s) {
                Ok(names) if !names.is_empty() => return Ok(names),
                Ok(_) => tracing::debug!(path = %path.display(), "champion cache is empty"),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring corrupt champion cache"
                ),
            }
        }
    }

    let names = client.champion_names().await?;

    if let Ok(json_str) = serde_json::to_string_pretty(&names) {
        if let Err(e) = write_string(path, &json_str) {
            tracing::warn!(path = %path.display(), error = %e, "could not write champion cache");
        }
    }

    Ok(names)
}
