//! HTTP utilities for Riot API communication

use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

/// Header carrying the static Riot API key
pub const RIOT_TOKEN_HEADER: &str = "x-riot-token";

/// Build the headers every Riot API request carries.
pub fn riot_header_map(api_key: &str) -> Result<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let mut token = HeaderValue::from_str(api_key.trim())?;
    token.set_sensitive(true);
    h.insert(HeaderName::from_static(RIOT_TOKEN_HEADER), token);
    Ok(h)
}
