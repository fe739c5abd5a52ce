//! Sync command implementation

use crate::{
    cli::PlayerArgs,
    riot::RiotClient,
    storage::{MatchRepository, RawMatch},
    Result,
};

use super::resolve_player;

/// Download the player's recent matches that are not stored yet and keep the
/// ones played this year.
///
/// Returns the ids that were inserted.
pub async fn handle_sync(
    repo: &mut MatchRepository,
    client: &RiotClient,
    player: &PlayerArgs,
    count: u32,
) -> Result<Vec<String>> {
    let info = resolve_player(repo, Some(client), player).await?;
    // Matches can only be stored for a registered player.
    repo.register_player(&info.puuid, info.game_name.as_deref(), info.tag_line.as_deref())?;

    let recent = client.match_ids(&info.puuid, count).await?;
    let mut unknown = repo.filter_unknown_match_ids(&recent)?;
    if unknown.is_empty() {
        println!("No new matches found. History is up to date.");
        return Ok(Vec::new());
    }
    // The API lists newest first; store oldest first.
    unknown.reverse();

    println!("Downloading {} new matches...", unknown.len());
    let mut payloads = Vec::with_capacity(unknown.len());
    for (i, match_id) in unknown.iter().enumerate() {
        match client.match_details(match_id).await {
            Ok(details) => payloads.push(RawMatch::Payload(details)),
            Err(e) => tracing::warn!(
                %match_id,
                error = %e,
                "skipping match that could not be downloaded"
            ),
        }
        tracing::debug!(done = i + 1, total = unknown.len(), "match download progress");
    }

    let inserted = repo.store_matches(&info.puuid, &payloads, None)?;
    println!(
        "✓ {} new matches stored ({} downloaded, {} outside the current year skipped)",
        inserted.len(),
        payloads.len(),
        payloads.len().saturating_sub(inserted.len())
    );

    Ok(inserted)
}
