//! Thin Riot API client. One request per call, no retries.

use std::time::Duration;

use reqwest::{header::HeaderMap, Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    cli::types::Puuid,
    core::riot_header_map,
    riot::types::{Account, ChampionMastery, ChampionNames, DataDragonChampions},
    LolError, Result,
};


/// Data Dragon CDN, which needs no API key.
pub const DDRAGON_BASE_URL: &str = "https://ddragon.leagueoflegends.com";

/// Every request is bounded by this timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Regional routing value (`americas`, `europe`, `asia`) to its API host
pub fn regional_base_url(region: &str) -> String {
    format!("https://{}.api.riotgames.com", region)
}

/// Platform routing value (`la1`, `na1`, `euw1`, ...) to its API host
pub fn platform_base_url(platform: &str) -> String {
    format!("https://{}.api.riotgames.com", platform)
}

/// Connection settings for [`RiotClient`]
#[derive(Debug, Clone)]
pub struct RiotSettings {
    pub api_key: String,
    pub region: String,
    pub platform: String,
    pub locale: String,
}

impl RiotSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            region: crate::DEFAULT_REGION.to_string(),
            platform: crate::DEFAULT_PLATFORM.to_string(),
            locale: crate::DEFAULT_LOCALE.to_string(),
        }
    }
}

pub struct RiotClient {
    client: Client,
    headers: HeaderMap,
    regional_base: String,
    platform_base: String,
    ddragon_base: String,
    locale: String,
}

impl RiotClient {
    pub fn new(settings: &RiotSettings) -> Result<Self> {
        Self::with_base_urls(
            settings,
            regional_base_url(&settings.region),
            platform_base_url(&settings.platform),
            DDRAGON_BASE_URL.to_string(),
        )
    }

    /// Point the client at custom hosts, e.g. a mock server in tests
    pub fn with_base_urls(
        settings: &RiotSettings,
        regional_base: impl Into<String>,
        platform_base: impl Into<String>,
        ddragon_base: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lol-stats/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            headers: riot_header_map(&settings.api_key)?,
            regional_base: regional_base.into().trim_end_matches('/').to_string(),
            platform_base: platform_base.into().trim_end_matches('/').to_string(),
            ddragon_base: ddragon_base.into().trim_end_matches('/').to_string(),
            locale: settings.locale.clone(),
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Build `base` + path segments, percent-encoding each segment.
    fn url(base: &str, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(base).map_err(|e| LolError::InvalidUrl(format!("{}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| LolError::InvalidUrl(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        authenticated: bool,
    ) -> Result<T> {
        tracing::debug!(%url, "GET");
        let mut builder = self.client.get(url).query(query);
        if authenticated {
            builder = builder.headers(self.headers.clone());
        }

        let res = builder.send().await?;
        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(LolError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(res.json::<T>().await?)
    }

    /// Account-V1: resolve a Riot ID to an account
    pub async fn account_by_riot_id(&self, game_name: &str, tag_line: &str) -> Result<Account> {
        let url = Self::url(
            &self.regional_base,
            &[
                "riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line,
            ],
        )?;
        self.get(url, &[], true).await
    }

    /// Match-V5: most recent match ids for a player, newest first
    pub async fn match_ids(&self, puuid: &Puuid, count: u32) -> Result<Vec<String>> {
        let url = Self::url(
            &self.regional_base,
            &["lol", "match", "v5", "matches", "by-puuid", puuid.as_str(), "ids"],
        )?;
        self.get(url, &[("count", count.to_string())], true).await
    }

    /// Match-V5: full match payload, kept untyped for storage
    pub async fn match_details(&self, match_id: &str) -> Result<Value> {
        let url = Self::url(&self.regional_base, &["lol", "match", "v5", "matches", match_id])?;
        self.get(url, &[], true).await
    }

    /// Match-V5: match timeline payload, kept untyped for storage
    pub async fn match_timeline(&self, match_id: &str) -> Result<Value> {
        let url = Self::url(
            &self.regional_base,
            &["lol", "match", "v5", "matches", match_id, "timeline"],
        )?;
        self.get(url, &[], true).await
    }

    /// Champion-Mastery-V4: all masteries for a player, highest points first
    pub async fn champion_mastery(&self, puuid: &Puuid) -> Result<Vec<ChampionMastery>> {
        let url = Self::url(
            &self.platform_base,
            &[
                "lol",
                "champion-mastery",
                "v4",
                "champion-masteries",
                "by-puuid",
                puuid.as_str(),
            ],
        )?;
        self.get(url, &[], true).await
    }

    /// Data Dragon: champion table for the latest game version
    pub async fn champion_names(&self) -> Result<ChampionNames> {
        let versions: Vec<String> = self
            .get(Self::url(&self.ddragon_base, &["api", "versions.json"])?, &[], false)
            .await?;
        let latest = versions
            .first()
            .ok_or_else(|| LolError::NoData("Data Dragon versions".to_string()))?;

        let url = Self::url(
            &self.ddragon_base,
            &["cdn", latest.as_str(), "data", self.locale.as_str(), "champion.json"],
        )?;
        let doc: DataDragonChampions = self.get(url, &[], false).await?;
        Ok(ChampionNames::from(doc))
    }
}
