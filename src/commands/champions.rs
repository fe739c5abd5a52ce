//! Champions command implementation

use crate::{
    core::champion_data_path,
    riot::{load_or_fetch_champion_names, ChampionNames, RiotClient},
    Result,
};

/// Load the champion table, fetching it when missing or when `refresh` is set
pub async fn handle_champions(client: &RiotClient, refresh: bool) -> Result<ChampionNames> {
    if refresh {
        println!("Fetching fresh champion data from Data Dragon...");
    } else {
        println!("Loading champion data (cached if available)...");
    }

    let names = load_or_fetch_champion_names(client, refresh).await?;

    println!("✓ {} champions loaded", names.len());
    println!(
        "Cached at: {}",
        champion_data_path(client.locale()).display()
    );

    Ok(names)
}
