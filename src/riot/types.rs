use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cli::types::Puuid;


/// Account-V1 response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Account {
    pub puuid: Puuid,
    #[serde(rename = "gameName", default)]
    pub game_name: Option<String>,
    #[serde(rename = "tagLine", default)]
    pub tag_line: Option<String>,
}

/// Champion-Mastery-V4 entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChampionMastery {
    #[serde(rename = "championId")]
    pub champion_id: i64,
    #[serde(rename = "championLevel", default)]
    pub champion_level: u32,
    #[serde(rename = "championPoints", default)]
    pub champion_points: u64,
    #[serde(rename = "chestGranted", default)]
    pub chest_granted: bool,
}

/// The subset of a Match-V5 payload the stats and views read.
///
/// The full payload is what gets stored; this is only a typed view over it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchMetadata {
    #[serde(rename = "matchId")]
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchInfo {
    /// Seconds
    #[serde(rename = "gameDuration", default)]
    pub game_duration: f64,
    #[serde(rename = "gameVersion", default)]
    pub game_version: Option<String>,
    #[serde(rename = "gameStartTimestamp", default)]
    pub game_start_timestamp: Option<i64>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl MatchInfo {
    /// Duration in minutes
    pub fn duration_minutes(&self) -> f64 {
        self.game_duration / 60.0
    }

    /// `major.minor` part of the game version, e.g. `14.3` for `14.3.558.106`
    pub fn patch(&self) -> Option<String> {
        let version = self.game_version.as_deref()?;
        let mut parts = version.split('.');
        match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
                Some(format!("{}.{}", major, minor))
            }
            _ => None,
        }
    }

    pub fn participant(&self, puuid: &Puuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == *puuid)
    }

    pub fn team(&self, team_id: i64) -> Option<&Team> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Participant {
    pub puuid: Puuid,
    #[serde(rename = "participantId", default)]
    pub participant_id: Option<u32>,
    #[serde(rename = "championId")]
    pub champion_id: i64,
    #[serde(rename = "teamId", default)]
    pub team_id: i64,
    #[serde(rename = "teamPosition", default)]
    pub team_position: Option<String>,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(rename = "goldEarned", default)]
    pub gold_earned: u64,
    #[serde(rename = "totalDamageDealtToChampions", default)]
    pub total_damage_dealt_to_champions: u64,
    #[serde(rename = "visionScore", default)]
    pub vision_score: u32,
    #[serde(rename = "riotIdGameName", default)]
    pub riot_id_game_name: Option<String>,
    #[serde(rename = "summonerName", default)]
    pub summoner_name: Option<String>,
    #[serde(default)]
    pub challenges: Option<Challenges>,
}

impl Participant {
    /// Riot ID game name, then legacy summoner name
    pub fn display_name(&self) -> Option<&str> {
        [&self.riot_id_game_name, &self.summoner_name]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .find(|n| !n.is_empty())
    }

    /// Empty positions (ARAM, remakes) are reported as `UNKNOWN`
    pub fn role(&self) -> &str {
        match self.team_position.as_deref() {
            Some(role) if !role.is_empty() => role,
            _ => "UNKNOWN",
        }
    }

    /// `kills/deaths/assists`
    pub fn kda_line(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }

    /// (kills + assists) / deaths, with deaths floored at one
    pub fn kda_ratio(&self) -> f64 {
        f64::from(self.kills + self.assists) / f64::from(self.deaths.max(1))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Challenges {
    #[serde(rename = "goldPerMinute", default)]
    pub gold_per_minute: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Team {
    #[serde(rename = "teamId")]
    pub team_id: i64,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub bans: Vec<Ban>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ban {
    #[serde(rename = "championId")]
    pub champion_id: i64,
    #[serde(rename = "pickTurn", default)]
    pub pick_turn: Option<u32>,
}

/// Match-V5 timeline, reduced to the per-frame participant snapshots
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimelineDto {
    pub info: TimelineInfo,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimelineInfo {
    #[serde(rename = "frameInterval", default)]
    pub frame_interval: Option<u64>,
    #[serde(default)]
    pub frames: Vec<TimelineFrame>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimelineFrame {
    #[serde(default)]
    pub timestamp: u64,
    /// Keyed by participant id as a string ("1".."10")
    #[serde(rename = "participantFrames", default)]
    pub participant_frames: BTreeMap<String, ParticipantFrame>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParticipantFrame {
    #[serde(rename = "totalGold", default)]
    pub total_gold: u64,
    #[serde(rename = "damageStats", default)]
    pub damage_stats: DamageStats,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DamageStats {
    #[serde(rename = "totalDamageDoneToChampions", default)]
    pub total_damage_done_to_champions: u64,
}

/// Data Dragon `champion.json` entry
#[derive(Debug, Clone, Deserialize)]
pub struct DataDragonChampion {
    /// Numeric champion id, as a string
    pub key: String,
    pub name: String,
}

/// Data Dragon `champion.json` document
#[derive(Debug, Clone, Deserialize)]
pub struct DataDragonChampions {
    pub data: BTreeMap<String, DataDragonChampion>,
}

/// Champion id to display name
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChampionNames(pub BTreeMap<i64, String>);

impl ChampionNames {
    /// Display name, or `ID:<id>` for champions missing from the table
    pub fn name_for(&self, champion_id: i64) -> String {
        self.0
            .get(&champion_id)
            .cloned()
            .unwrap_or_else(|| format!("ID:{}", champion_id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<DataDragonChampions> for ChampionNames {
    fn from(doc: DataDragonChampions) -> Self {
        Self(
            doc.data
                .into_values()
                .filter_map(|c| c.key.parse::<i64>().ok().map(|id| (id, c.name)))
                .collect(),
        )
    }
}
