//! Type-safe wrappers for Riot identifiers and calendar years.

pub mod ids;
pub mod time;

pub use ids::{Puuid, RiotId};
pub use time::GameYear;
