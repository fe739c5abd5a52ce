//! Storage layer for the League of Legends stats CLI
//!
//! This module provides a clean abstraction over the SQLite database,
//! organized into logical components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `normalize`: Turning raw match payloads into year-scoped records
//! - `queries`: Repository operations (registration, dedup insert, reads)

pub mod models;
pub mod normalize;
pub mod queries;
pub mod schema;

#[cfg(test)]
mod tests;

// Re-export the main types and repository struct for easy access
pub use models::*;
pub use normalize::normalize;
pub use queries::EXISTENCE_CHECK_BATCH_SIZE;
pub use schema::{MatchRepository, DEFAULT_DB_PATH};
