//! Core utilities for the League of Legends stats CLI
//!
//! This module consolidates helpers used across the application:
//! - `cache`: file cache helpers and the in-memory timeline cache
//! - `http`: Riot API request headers

pub mod cache;
pub mod http;

// Re-export commonly used items for convenience
pub use cache::{champion_data_path, try_read_to_string, write_string, TimelineCache};
pub use http::riot_header_map;
