//! Aggregate statistics command implementation

use serde::Serialize;

use crate::{
    cli::{types::GameYear, PlayerArgs},
    riot::RiotClient,
    stats::{summarize, BanRate, PlayerSummary},
    storage::MatchRepository,
    Result,
};

use super::{champion_names, resolve_player};

/// Headline numbers plus the full breakdown, as printed with `--json`
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub player: String,
    pub year: Option<GameYear>,
    pub games: u32,
    pub win_rate: f64,
    pub kda: f64,
    pub gold_per_minute: f64,
    pub bans: Vec<BanRate>,
    pub summary: PlayerSummary,
}

impl StatsReport {
    pub fn new(player: String, year: Option<GameYear>, summary: PlayerSummary) -> Self {
        Self {
            player,
            year,
            games: summary.overall.games,
            win_rate: summary.overall.win_rate(),
            kda: summary.overall.kda(),
            gold_per_minute: summary.overall.gold_per_minute(),
            bans: summary.ban_rates(),
            summary,
        }
    }
}

/// Handle the stats command
pub async fn handle_stats(
    repo: &mut MatchRepository,
    client: Option<&RiotClient>,
    player: &PlayerArgs,
    year: Option<GameYear>,
    as_json: bool,
) -> Result<StatsReport> {
    let info = resolve_player(repo, client, player).await?;
    let names = champion_names(client).await;
    let records = repo.get_stored_matches(&info.puuid, year, None, None)?;
    let summary = summarize(&records, &info.puuid, &names);

    let report = StatsReport::new(
        info.display_name().unwrap_or_else(|| info.puuid.to_string()),
        year,
        summary,
    );

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(report)
}

fn print_report(report: &StatsReport) {
    let summary = &report.summary;
    let overall = &summary.overall;
    if overall.games == 0 {
        println!("No analysable matches stored for {}.", report.player);
        return;
    }

    println!("{} ({} games)", report.player, overall.games);
    println!(
        "Win rate: {:.1}%  KDA: {:.2}  Gold/min: {:.0}  Avg K/D/A: {}",
        overall.win_rate(),
        overall.kda(),
        overall.gold_per_minute(),
        overall.average_kda_line()
    );

    println!("\nBy role:");
    for (role, stats) in &summary.by_role {
        let t = &stats.totals;
        println!(
            "  {:<8} {:>3} games  WR {:>5.1}%  KDA {:>5.2}  Gold@15 {:>6.0}  Gold/min {:>4.0}",
            role,
            t.games,
            t.win_rate(),
            t.kda(),
            t.average_gold_at_15(),
            t.gold_per_minute()
        );
    }

    println!("\nBy champion:");
    for (champion, stats) in summary.champions_by_picks() {
        let t = &stats.totals;
        println!(
            "  {:<14} {:>3} games  pick {:>5.1}%  WR {:>5.1}%  KDA {:>5.2}  Gold/min {:>4.0}  {}",
            champion,
            t.games,
            stats.pick_rate(overall.games),
            t.win_rate(),
            t.kda(),
            t.gold_per_minute(),
            stats.main_role().unwrap_or("-")
        );
    }

    if !summary.by_patch.is_empty() {
        println!("\nBy patch:");
        for (patch, t) in &summary.by_patch {
            println!("  {:<8} {:>3} games  WR {:>5.1}%", patch, t.games, t.win_rate());
        }
    }

    if !report.bans.is_empty() {
        println!("\nTeam bans:");
        for ban in &report.bans {
            println!("  {:<14} {:>3}  ({:.1}%)", ban.champion, ban.count, ban.rate);
        }
    }
}
