//! Match timeline command implementation

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{
    riot::{MatchDto, RiotClient, TimelineDto},
    storage::MatchRepository,
    LolError, Result, API_KEY_ENV_VAR,
};

/// Gold and champion damage of one participant, one value per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSeries {
    pub participant_id: u32,
    pub name: String,
    pub gold: Vec<u64>,
    pub damage_to_champions: Vec<u64>,
}

impl ParticipantSeries {
    pub fn final_gold(&self) -> u64 {
        self.gold.last().copied().unwrap_or_default()
    }

    pub fn final_damage(&self) -> u64 {
        self.damage_to_champions.last().copied().unwrap_or_default()
    }
}

/// Timeline from the store, or fetched and stored on first access.
///
/// A timeline for a match that is not stored is returned but not cached.
pub async fn load_timeline(
    repo: &mut MatchRepository,
    client: Option<&RiotClient>,
    match_id: &str,
) -> Result<Value> {
    if let Some(timeline) = repo.get_match_timeline(match_id)? {
        tracing::debug!(%match_id, "timeline served from store");
        return Ok(timeline);
    }

    let client = client.ok_or_else(|| LolError::MissingApiKey {
        env_var: API_KEY_ENV_VAR.to_string(),
    })?;
    let timeline = client.match_timeline(match_id).await?;

    match repo.store_match_timeline(match_id, &timeline) {
        Ok(_) => {}
        Err(LolError::UnknownMatch { .. }) => {
            tracing::debug!(%match_id, "match not stored, timeline not cached");
        }
        Err(e) => return Err(e),
    }

    Ok(timeline)
}

/// Per-participant series, named from the match payload when it is available
pub fn participant_series(
    timeline: &TimelineDto,
    details: Option<&MatchDto>,
) -> Vec<ParticipantSeries> {
    let names: BTreeMap<u32, String> = details
        .map(|dto| {
            dto.info
                .participants
                .iter()
                .filter_map(|p| Some((p.participant_id?, p.display_name()?.to_string())))
                .collect()
        })
        .unwrap_or_default();

    let mut series: BTreeMap<u32, ParticipantSeries> = BTreeMap::new();
    for frame in &timeline.info.frames {
        for (key, pf) in &frame.participant_frames {
            let Ok(participant_id) = key.parse::<u32>() else {
                continue;
            };
            let entry = series.entry(participant_id).or_insert_with(|| ParticipantSeries {
                participant_id,
                name: names
                    .get(&participant_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Player {}", participant_id)),
                gold: Vec::new(),
                damage_to_champions: Vec::new(),
            });
            entry.gold.push(pf.total_gold);
            entry
                .damage_to_champions
                .push(pf.damage_stats.total_damage_done_to_champions);
        }
    }

    series.into_values().collect()
}

/// Handle the timeline command
pub async fn handle_timeline(
    repo: &mut MatchRepository,
    client: Option<&RiotClient>,
    match_id: &str,
    as_json: bool,
) -> Result<Vec<ParticipantSeries>> {
    let raw = load_timeline(repo, client, match_id).await?;
    let timeline: TimelineDto = serde_json::from_value(raw)?;

    let details = repo
        .get_match(match_id)?
        .and_then(|record| record.raw_json)
        .and_then(|raw| serde_json::from_str::<MatchDto>(&raw).ok());
    let series = participant_series(&timeline, details.as_ref());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(series);
    }

    if timeline.info.frames.is_empty() {
        println!("No timeline frames available for {}.", match_id);
        return Ok(series);
    }

    println!("{} ({} frames)", match_id, timeline.info.frames.len());
    for s in &series {
        println!(
            "  {:>2}. {:<18} gold {:>6}  damage to champions {:>6}",
            s.participant_id,
            s.name,
            s.final_gold(),
            s.final_damage()
        );
    }

    Ok(series)
}
