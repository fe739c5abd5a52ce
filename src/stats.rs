//! Aggregate statistics over a player's stored matches.
//!
//! Stored payloads are parsed in parallel into [`GameLine`]s, one per match in
//! which the player took part, then folded into a [`PlayerSummary`].

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::types::Puuid;
use crate::riot::types::{ChampionNames, MatchDto};
use crate::storage::MatchRecord;


/// Minutes used for the gold@15 estimate
pub const GOLD_SNAPSHOT_MINUTE: f64 = 15.0;

/// One player's line in one match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLine {
    pub match_id: String,
    pub champion_id: i64,
    pub champion: String,
    pub role: String,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_earned: u64,
    pub duration_minutes: f64,
    pub gold_at_15: f64,
    pub patch: Option<String>,
    /// First ban of the player's team, if any
    pub ban: Option<String>,
}

impl GameLine {
    /// Extract `puuid`'s line from a match. `None` if they did not play in it.
    pub fn from_match(dto: &MatchDto, puuid: &Puuid, names: &ChampionNames) -> Option<Self> {
        let info = &dto.info;
        let p = info.participant(puuid)?;
        let duration_minutes = info.duration_minutes();

        let gold_per_min = if duration_minutes > 0.0 {
            p.gold_earned as f64 / duration_minutes
        } else {
            0.0
        };
        let gold_at_15 = match p.challenges.as_ref().and_then(|c| c.gold_per_minute) {
            Some(gpm) if gpm > 0.0 => gpm * GOLD_SNAPSHOT_MINUTE,
            _ => gold_per_min * duration_minutes.min(GOLD_SNAPSHOT_MINUTE),
        };

        let ban = info
            .team(p.team_id)
            .and_then(|t| t.bans.first())
            .filter(|b| b.champion_id != -1)
            .map(|b| names.name_for(b.champion_id));

        Some(Self {
            match_id: dto.metadata.match_id.clone(),
            champion_id: p.champion_id,
            champion: names.name_for(p.champion_id),
            role: p.role().to_string(),
            win: p.win,
            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,
            gold_earned: p.gold_earned,
            duration_minutes,
            gold_at_15,
            patch: info.patch(),
            ban,
        })
    }

    pub fn kda_ratio(&self) -> f64 {
        f64::from(self.kills + self.assists) / f64::from(self.deaths.max(1))
    }
}

/// Parse stored payloads in parallel, skipping records without a payload or
/// with one that does not look like a match.
pub fn parse_stored_matches(records: &[MatchRecord]) -> Vec<MatchDto> {
    records
        .par_iter()
        .filter_map(|record| {
            let raw = record.raw_json.as_deref()?;
            match serde_json::from_str::<MatchDto>(raw) {
                Ok(dto) => Some(dto),
                Err(e) => {
                    tracing::debug!(
                        match_id = %record.match_id,
                        error = %e,
                        "skipping unparseable match"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Game lines for `puuid` across `records`, in record order
pub fn game_lines(records: &[MatchRecord], puuid: &Puuid, names: &ChampionNames) -> Vec<GameLine> {
    parse_stored_matches(records)
        .iter()
        .filter_map(|dto| GameLine::from_match(dto, puuid, names))
        .collect()
}

/// Running totals shared by every aggregate level
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatTotals {
    pub games: u32,
    pub wins: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold: u64,
    pub duration_minutes: f64,
    pub gold_at_15: f64,
}

impl StatTotals {
    pub fn record(&mut self, line: &GameLine) {
        self.games += 1;
        self.wins += u32::from(line.win);
        self.kills += line.kills;
        self.deaths += line.deaths;
        self.assists += line.assists;
        self.gold += line.gold_earned;
        self.duration_minutes += line.duration_minutes;
        self.gold_at_15 += line.gold_at_15;
    }

    /// Percentage of games won, 0 with no games
    pub fn win_rate(&self) -> f64 {
        percentage(self.wins, self.games)
    }

    /// (kills + assists) / deaths, deaths floored at one
    pub fn kda(&self) -> f64 {
        f64::from(self.kills + self.assists) / f64::from(self.deaths.max(1))
    }

    pub fn gold_per_minute(&self) -> f64 {
        if self.duration_minutes > 0.0 {
            self.gold as f64 / self.duration_minutes
        } else {
            0.0
        }
    }

    pub fn average_gold_at_15(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.gold_at_15 / f64::from(self.games)
        }
    }

    /// Average `K/D/A` per game, one decimal each
    pub fn average_kda_line(&self) -> String {
        if self.games == 0 {
            return "0.0/0.0/0.0".to_string();
        }
        let games = f64::from(self.games);
        format!(
            "{:.1}/{:.1}/{:.1}",
            f64::from(self.kills) / games,
            f64::from(self.deaths) / games,
            f64::from(self.assists) / games
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleStats {
    pub totals: StatTotals,
    /// Champion name to games played in this role
    pub champions: BTreeMap<String, u32>,
}

impl RoleStats {
    pub fn record(&mut self, line: &GameLine) {
        self.totals.record(line);
        *self.champions.entry(line.champion.clone()).or_default() += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChampionStats {
    pub totals: StatTotals,
    /// Role to games played on this champion
    pub roles: BTreeMap<String, u32>,
    /// Patch to totals on this champion
    pub patches: BTreeMap<String, StatTotals>,
}

impl ChampionStats {
    pub fn record(&mut self, line: &GameLine) {
        self.totals.record(line);
        *self.roles.entry(line.role.clone()).or_default() += 1;
        if let Some(patch) = &line.patch {
            self.patches.entry(patch.clone()).or_default().record(line);
        }
    }

    /// Percentage of all games in which this champion was picked
    pub fn pick_rate(&self, total_games: u32) -> f64 {
        percentage(self.totals.games, total_games)
    }

    /// Role played most often, ties broken alphabetically
    pub fn main_role(&self) -> Option<&str> {
        self.roles
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(role, _)| role.as_str())
    }
}

/// A team ban and how often it happened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanRate {
    pub champion: String,
    pub count: u32,
    pub rate: f64,
}

/// Everything the `stats` command reports for one player
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub overall: StatTotals,
    pub by_role: BTreeMap<String, RoleStats>,
    pub by_champion: BTreeMap<String, ChampionStats>,
    pub by_patch: BTreeMap<String, StatTotals>,
    /// Champion name to number of games in which the player's team banned it first
    pub bans: BTreeMap<String, u32>,
}

impl PlayerSummary {
    pub fn record(&mut self, line: &GameLine) {
        self.overall.record(line);
        self.by_role
            .entry(line.role.clone())
            .or_default()
            .record(line);
        self.by_champion
            .entry(line.champion.clone())
            .or_default()
            .record(line);
        if let Some(patch) = &line.patch {
            self.by_patch.entry(patch.clone()).or_default().record(line);
        }
        if let Some(ban) = &line.ban {
            *self.bans.entry(ban.clone()).or_default() += 1;
        }
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a GameLine>) -> Self {
        let mut summary = Self::default();
        for line in lines {
            summary.record(line);
        }
        summary
    }

    /// Ban rates over all games, most banned first
    pub fn ban_rates(&self) -> Vec<BanRate> {
        let mut rates: Vec<BanRate> = self
            .bans
            .iter()
            .map(|(champion, &count)| BanRate {
                champion: champion.clone(),
                count,
                rate: percentage(count, self.overall.games),
            })
            .collect();
        rates.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.champion.cmp(&b.champion)));
        rates
    }

    /// Champions by games played, most played first
    pub fn champions_by_picks(&self) -> Vec<(&str, &ChampionStats)> {
        let mut champions: Vec<(&str, &ChampionStats)> = self
            .by_champion
            .iter()
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();
        champions.sort_by(|a, b| {
            b.1.totals
                .games
                .cmp(&a.1.totals.games)
                .then_with(|| a.0.cmp(b.0))
        });
        champions
    }
}

/// Summarize `puuid`'s stored matches
pub fn summarize(records: &[MatchRecord], puuid: &Puuid, names: &ChampionNames) -> PlayerSummary {
    PlayerSummary::from_lines(&game_lines(records, puuid, names))
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}
