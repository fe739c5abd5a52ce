//! Error types for the League of Legends stats CLI

use thiserror::Error;


pub type Result<T> = std::result::Result<T, LolError>;

#[derive(Error, Debug)]
pub enum LolError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Riot API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Riot API returned no data: {0}")]
    NoData(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("API key not provided and {env_var} environment variable not set")]
    MissingApiKey { env_var: String },

    #[error("Invalid Riot ID '{input}', expected NAME#TAG")]
    InvalidRiotId { input: String },

    #[error("Failed to parse year: {0}")]
    InvalidYear(#[from] std::num::ParseIntError),

    #[error("Match repository has been closed")]
    ClosedResource,

    #[error("Match payload has no identifier")]
    MalformedRecord,

    #[error("Player {puuid} is not registered")]
    ReferentialIntegrity { puuid: String },

    #[error("Match {match_id} is not stored")]
    UnknownMatch { match_id: String },

    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },
}
