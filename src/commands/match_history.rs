//! Stored match history command implementation

use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    cli::{types::GameYear, PlayerArgs},
    riot::{ChampionNames, MatchDto, Participant, RiotClient},
    stats::GameLine,
    storage::{MatchRecord, MatchRepository},
    Puuid, Result,
};

use super::{champion_names, resolve_player};

/// Parameters for the matches command
#[derive(Debug, Clone)]
pub struct MatchesParams {
    pub player: PlayerArgs,
    pub year: Option<GameYear>,
    /// 1-based
    pub page: u32,
    pub per_page: u32,
    pub as_json: bool,
    /// Print the team breakdown under each match
    pub details: bool,
}

/// One player's row in a team breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub name: String,
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub damage_to_champions: u64,
    pub gold: u64,
    pub vision_score: u32,
}

impl PlayerRow {
    fn from_participant(participant: &Participant, names: &ChampionNames) -> Self {
        Self {
            name: participant_name(participant),
            champion: names.name_for(participant.champion_id),
            kills: participant.kills,
            deaths: participant.deaths,
            assists: participant.assists,
            damage_to_champions: participant.total_damage_dealt_to_champions,
            gold: participant.gold_earned,
            vision_score: participant.vision_score,
        }
    }
}

/// Players of one team with the team's result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamBreakdown {
    pub team_id: i64,
    pub win: bool,
    pub players: Vec<PlayerRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisionEntry {
    pub name: String,
    pub vision_score: u32,
}

/// Team tables and vision ranking of a single match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetails {
    pub teams: Vec<TeamBreakdown>,
    pub vision_ranking: Vec<VisionEntry>,
}

impl MatchDetails {
    pub fn from_match(dto: &MatchDto, names: &ChampionNames) -> Self {
        Self {
            teams: team_breakdown(dto, names),
            vision_ranking: vision_ranking(dto),
        }
    }
}

fn participant_name(participant: &Participant) -> String {
    match (participant.display_name(), participant.participant_id) {
        (Some(name), _) => name.to_string(),
        (None, Some(id)) => format!("Player {}", id),
        (None, None) => "Player".to_string(),
    }
}

/// Group a match's participants by team, in ascending team id order.
///
/// The team result comes from `info.teams`, or from its players when the
/// team entry is missing.
pub fn team_breakdown(dto: &MatchDto, names: &ChampionNames) -> Vec<TeamBreakdown> {
    let mut by_team: BTreeMap<i64, Vec<&Participant>> = BTreeMap::new();
    for participant in &dto.info.participants {
        by_team
            .entry(participant.team_id)
            .or_default()
            .push(participant);
    }

    by_team
        .into_iter()
        .map(|(team_id, players)| {
            let win = match dto.info.team(team_id) {
                Some(team) => team.win,
                None => players.first().is_some_and(|p| p.win),
            };
            TeamBreakdown {
                team_id,
                win,
                players: players
                    .into_iter()
                    .map(|p| PlayerRow::from_participant(p, names))
                    .collect(),
            }
        })
        .collect()
}

/// Every participant by vision score, highest first
pub fn vision_ranking(dto: &MatchDto) -> Vec<VisionEntry> {
    let mut ranking: Vec<VisionEntry> = dto
        .info
        .participants
        .iter()
        .map(|p| VisionEntry {
            name: participant_name(p),
            vision_score: p.vision_score,
        })
        .collect();
    ranking.sort_by(|a, b| b.vision_score.cmp(&a.vision_score));
    ranking
}

/// One row of the history listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub game_year: GameYear,
    /// `None` when the stored record has no payload or the player is not in it
    pub line: Option<GameLine>,
    /// Only filled when details were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<MatchDetails>,
}

impl MatchSummary {
    pub fn from_record(
        record: &MatchRecord,
        puuid: &Puuid,
        names: &ChampionNames,
        with_details: bool,
    ) -> Self {
        let dto = record
            .raw_json
            .as_deref()
            .and_then(|raw| serde_json::from_str::<MatchDto>(raw).ok());
        let line = dto
            .as_ref()
            .and_then(|dto| GameLine::from_match(dto, puuid, names));
        let details = dto
            .as_ref()
            .filter(|_| with_details)
            .map(|dto| MatchDetails::from_match(dto, names));
        Self {
            match_id: record.match_id.clone(),
            game_year: record.game_year,
            line,
            details,
        }
    }
}

/// A page of stored matches, most recent first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPage {
    pub page: u32,
    pub total_pages: u32,
    pub total_matches: u64,
    pub matches: Vec<MatchSummary>,
}

/// Read one page of a player's stored matches
pub fn load_match_page(
    repo: &MatchRepository,
    puuid: &Puuid,
    year: Option<GameYear>,
    page: u32,
    per_page: u32,
    names: &ChampionNames,
    with_details: bool,
) -> Result<MatchPage> {
    let per_page = per_page.max(1);
    let page = page.max(1);

    let total_matches = match year {
        Some(_) => repo.get_stored_match_ids(puuid, year)?.len() as u64,
        None => repo.get_match_count(puuid)?,
    };
    let total_pages = total_matches.div_ceil(u64::from(per_page)) as u32;

    let offset = (page - 1).saturating_mul(per_page);
    let records = repo.get_stored_matches(puuid, year, Some(per_page), Some(offset))?;

    Ok(MatchPage {
        page,
        total_pages,
        total_matches,
        matches: records
            .iter()
            .map(|r| MatchSummary::from_record(r, puuid, names, with_details))
            .collect(),
    })
}

/// Handle the matches command
pub async fn handle_matches(
    repo: &mut MatchRepository,
    client: Option<&RiotClient>,
    params: MatchesParams,
) -> Result<MatchPage> {
    let info = resolve_player(repo, client, &params.player).await?;
    let names = champion_names(client).await;
    let page = load_match_page(
        repo,
        &info.puuid,
        params.year,
        params.page,
        params.per_page,
        &names,
        params.details,
    )?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(page);
    }

    if page.total_matches == 0 {
        println!("No stored matches for this player. Run `sync` first.");
        return Ok(page);
    }

    let player_name = info.display_name().unwrap_or_else(|| info.puuid.to_string());
    println!(
        "Page {} of {} ({} matches total) for {}",
        page.page, page.total_pages, page.total_matches, player_name
    );
    for summary in &page.matches {
        match &summary.line {
            Some(line) => println!(
                "{:<16} {:<14} {:<8} {:>9} ({:.2}:1)  {}",
                summary.match_id,
                line.champion,
                line.role,
                format!("{}/{}/{}", line.kills, line.deaths, line.assists),
                line.kda_ratio(),
                if line.win { "Victory" } else { "Defeat" }
            ),
            None => println!("{:<16} (no details stored)", summary.match_id),
        }
        if let Some(details) = &summary.details {
            print_details(details);
        }
    }

    Ok(page)
}

fn print_details(details: &MatchDetails) {
    for team in &details.teams {
        println!(
            "  Team {} ({})",
            team.team_id,
            if team.win { "Victory" } else { "Defeat" }
        );
        println!(
            "    {:<18} {:<14} {:>9} {:>8} {:>7} {:>6}",
            "Player", "Champion", "K/D/A", "Damage", "Gold", "Vision"
        );
        for row in &team.players {
            println!(
                "    {:<18} {:<14} {:>9} {:>8} {:>7} {:>6}",
                row.name,
                row.champion,
                format!("{}/{}/{}", row.kills, row.deaths, row.assists),
                row.damage_to_champions,
                row.gold,
                row.vision_score
            );
        }
    }

    println!("  Vision ranking");
    for (rank, entry) in details.vision_ranking.iter().enumerate() {
        println!("    {:>2}. {:<18} {:>4}", rank + 1, entry.name, entry.vision_score);
    }
}
