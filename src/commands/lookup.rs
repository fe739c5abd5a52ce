//! Lookup command implementation

use crate::{
    cli::types::RiotId,
    riot::RiotClient,
    storage::{MatchRepository, PlayerInfo},
    LolError, Result,
};

/// Resolve a Riot ID through the API, register the player and print its PUUID
pub async fn handle_lookup(
    repo: &mut MatchRepository,
    client: &RiotClient,
    riot_id: &RiotId,
) -> Result<PlayerInfo> {
    let account = client
        .account_by_riot_id(&riot_id.game_name, &riot_id.tag_line)
        .await?;

    repo.register_player(
        &account.puuid,
        account.game_name.as_deref().or(Some(riot_id.game_name.as_str())),
        account.tag_line.as_deref().or(Some(riot_id.tag_line.as_str())),
    )?;
    let info = repo
        .get_player(&account.puuid)?
        .ok_or_else(|| LolError::PlayerNotFound {
            name: riot_id.to_string(),
        })?;

    let stored = repo.get_match_count(&info.puuid)?;
    println!(
        "{}  {}",
        info.display_name().unwrap_or_else(|| riot_id.to_string()),
        info.puuid
    );
    println!("{} stored matches", stored);

    Ok(info)
}
