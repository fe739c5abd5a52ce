//! Champion mastery command implementation

use serde::Serialize;

use crate::{
    cli::PlayerArgs,
    riot::{ChampionNames, ChampionMastery, RiotClient},
    storage::MatchRepository,
    Result,
};

use super::{champion_names, resolve_player};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasteryLine {
    pub champion: String,
    pub level: u32,
    pub points: u64,
}

/// Highest `top` masteries by points
pub fn top_masteries(
    masteries: &[ChampionMastery],
    top: usize,
    names: &ChampionNames,
) -> Vec<MasteryLine> {
    let mut sorted: Vec<&ChampionMastery> = masteries.iter().collect();
    sorted.sort_by(|a, b| b.champion_points.cmp(&a.champion_points));
    sorted
        .into_iter()
        .take(top)
        .map(|m| MasteryLine {
            champion: names.name_for(m.champion_id),
            level: m.champion_level,
            points: m.champion_points,
        })
        .collect()
}

/// Handle the mastery command
pub async fn handle_mastery(
    repo: &mut MatchRepository,
    client: &RiotClient,
    player: &PlayerArgs,
    top: usize,
    as_json: bool,
) -> Result<Vec<MasteryLine>> {
    let info = resolve_player(repo, Some(client), player).await?;
    let masteries = client.champion_mastery(&info.puuid).await?;
    let names = champion_names(Some(client)).await;
    let lines = top_masteries(&masteries, top, &names);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else if lines.is_empty() {
        println!("No champion mastery data for this player.");
    } else {
        for (rank, line) in lines.iter().enumerate() {
            println!(
                "{:>2}. {:<14} level {:>2}  {:>9} points",
                rank + 1,
                line.champion,
                line.level,
                line.points
            );
        }
    }

    Ok(lines)
}
