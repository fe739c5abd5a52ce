//! League of Legends match history and stats library
//!
//! Keeps a local, year-scoped store of a player's matches pulled from the Riot
//! Games API and computes aggregate statistics over it.
//!
//! ## Features
//!
//! - **Deduplicated ingestion**: matches already stored are never re-inserted,
//!   and only matches played in the current calendar year are kept
//! - **Paginated history**: stored matches read back most recent first
//! - **Timeline cache**: match timelines are downloaded once and kept
//! - **Statistics**: win rate, KDA, gold, pick and ban rates per role,
//!   champion and patch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lol_stats::{storage::RawMatch, MatchRepository, Puuid};
//! use serde_json::json;
//!
//! # fn example() -> lol_stats::Result<()> {
//! let mut repo = MatchRepository::open("data/processed/lol_matches.db")?;
//! let puuid = Puuid::new("puuid-1");
//! repo.register_player(&puuid, Some("El Jods"), Some("LAN"))?;
//!
//! let raw = vec![RawMatch::from(json!({
//!     "metadata": { "matchId": "LA1_1" },
//!     "info": { "gameStartTimestamp": 1_735_000_000_000_i64 }
//! }))];
//! let inserted = repo.store_matches(&puuid, &raw, None)?;
//! println!("{} new matches", inserted.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export RIOT_API_KEY=RGAPI-...
//! export RIOT_REGION=americas   # account and match routing
//! export RIOT_PLATFORM=la1      # champion mastery routing
//! export LOL_STATS_DB=data/processed/lol_matches.db
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod riot;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{GameYear, Puuid, RiotId};
pub use error::{LolError, Result};
pub use riot::{RiotClient, RiotSettings};
pub use storage::{MatchRecord, MatchRepository, PlayerInfo, RawMatch};

pub const API_KEY_ENV_VAR: &str = "RIOT_API_KEY";
pub const REGION_ENV_VAR: &str = "RIOT_REGION";
pub const PLATFORM_ENV_VAR: &str = "RIOT_PLATFORM";
pub const DB_PATH_ENV_VAR: &str = "LOL_STATS_DB";

pub const DEFAULT_REGION: &str = "americas";
pub const DEFAULT_PLATFORM: &str = "la1";
/// Data Dragon locale for champion names
pub const DEFAULT_LOCALE: &str = "es_MX";
