//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{GameYear, Puuid, RiotId};

/// Which player a command is about
#[derive(Debug, Clone, Args)]
pub struct PlayerArgs {
    /// Riot ID, e.g. `Faker#KR1`.
    #[clap(value_name = "NAME#TAG", required_unless_present = "puuid")]
    pub riot_id: Option<RiotId>,

    /// Use a PUUID directly instead of a Riot ID.
    #[clap(long, conflicts_with = "riot_id")]
    pub puuid: Option<Puuid>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a Riot ID, register the player and print its PUUID
    Lookup {
        #[clap(value_name = "NAME#TAG")]
        riot_id: RiotId,
    },

    /// Download the player's recent matches and store the ones from this year.
    ///
    /// Only matches missing from the local store are requested in full.
    Sync {
        #[clap(flatten)]
        player: PlayerArgs,

        /// Number of recent match ids to request (1-100).
        #[clap(
            long,
            short,
            default_value_t = 20,
            value_parser = clap::value_parser!(u32).range(1..=100)
        )]
        count: u32,
    },

    /// List stored matches, most recent first
    Matches {
        #[clap(flatten)]
        player: PlayerArgs,

        /// Only matches from this year.
        #[clap(long, short)]
        year: Option<GameYear>,

        /// Page number, starting at 1.
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Matches per page.
        #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        per_page: u32,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,

        /// Show each match's team breakdown and vision ranking.
        #[clap(long)]
        details: bool,
    },

    /// Aggregate statistics over stored matches: overall, per role, per champion,
    /// per patch and team bans
    Stats {
        #[clap(flatten)]
        player: PlayerArgs,

        /// Only matches from this year.
        #[clap(long, short)]
        year: Option<GameYear>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Show a match timeline, fetching and caching it on first use
    Timeline {
        #[clap(value_name = "MATCH_ID")]
        match_id: String,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Show the player's top champion masteries
    Mastery {
        #[clap(flatten)]
        player: PlayerArgs,

        /// Number of champions to show.
        #[clap(long, short, default_value_t = 10)]
        top: usize,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Load the champion name table, fetching it from Data Dragon if not cached
    Champions {
        /// Force refresh from Data Dragon, overwriting the cache.
        #[clap(long)]
        refresh: bool,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "lol-stats", about = "League of Legends match history and stats CLI")]
pub struct Cli {
    /// SQLite database path (or set `LOL_STATS_DB` env var).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
