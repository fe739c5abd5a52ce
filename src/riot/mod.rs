//! Riot Games API access: HTTP client, response types and the champion table

pub mod champions;
pub mod http;
pub mod types;

pub use champions::{load_cached_champion_names, load_or_fetch_champion_names};
pub use http::{RiotClient, RiotSettings};
pub use types::{Account, ChampionMastery, ChampionNames, MatchDto, Participant, TimelineDto};
