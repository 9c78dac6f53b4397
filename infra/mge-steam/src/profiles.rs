use std::{sync::Arc, time::Duration};

use mge_core::SteamId64;
use mge_stats_app::ports::steam_profile::{
    DEFAULT_AVATAR_URL, SteamProfile, SteamProfilePort, UNKNOWN_PERSONA_NAME,
};

use crate::{SteamConfig, SteamError};

const PLAYER_SUMMARIES_URL: &str =
    "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
const PROFILE_TTL: Duration = Duration::from_secs(60 * 60);
const FAILURE_TTL: Duration = Duration::from_secs(5 * 60);
const CACHE_CAPACITY: u64 = 10_000;

#[derive(serde::Deserialize, Debug)]
struct PlayerSummariesResponse {
    response: PlayerSummaries,
}

#[derive(serde::Deserialize, Debug)]
struct PlayerSummaries {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(serde::Deserialize, Debug)]
struct PlayerSummary {
    personaname: Option<String>,
    avatarfull: Option<String>,
    profileurl: Option<String>,
}

fn profile_from_summaries(
    steam_id: SteamId64,
    summaries: PlayerSummariesResponse,
) -> Result<SteamProfile, SteamError> {
    let player = summaries
        .response
        .players
        .into_iter()
        .next()
        .ok_or_else(|| SteamError::PlayerMissing(steam_id.to_string()))?;
    Ok(SteamProfile {
        steam_id,
        persona_name: player
            .personaname
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_PERSONA_NAME.to_string()),
        avatar_url: player
            .avatarfull
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        profile_url: player.profileurl,
    })
}

/// `GetPlayerSummaries` client with separate lifetimes for hits and fallbacks.
pub struct SteamProfileService {
    client: reqwest::Client,
    api_key: String,
    profiles: Arc<moka::sync::Cache<SteamId64, SteamProfile>>,
    failures: Arc<moka::sync::Cache<SteamId64, SteamProfile>>,
}

impl SteamProfileService {
    pub fn new(config: &SteamConfig) -> Result<Self, SteamError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            profiles: Arc::new(
                moka::sync::Cache::builder()
                    .max_capacity(CACHE_CAPACITY)
                    .time_to_live(PROFILE_TTL)
                    .build(),
            ),
            failures: Arc::new(
                moka::sync::Cache::builder()
                    .max_capacity(CACHE_CAPACITY)
                    .time_to_live(FAILURE_TTL)
                    .build(),
            ),
        })
    }

    fn cached(&self, steam_id: SteamId64) -> Option<SteamProfile> {
        self.profiles
            .get(&steam_id)
            .or_else(|| self.failures.get(&steam_id))
    }

    async fn fetch(&self, steam_id: SteamId64) -> Result<SteamProfile, SteamError> {
        let steam_ids = steam_id.to_string();
        let summaries = self
            .client
            .get(PLAYER_SUMMARIES_URL)
            .query(&[("key", self.api_key.as_str()), ("steamids", steam_ids.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<PlayerSummariesResponse>()
            .await?;
        profile_from_summaries(steam_id, summaries)
    }
}

#[async_trait::async_trait]
impl SteamProfilePort for SteamProfileService {
    async fn get_profile(&self, steam_id: SteamId64) -> SteamProfile {
        if self.api_key.is_empty() {
            return SteamProfile::placeholder(steam_id);
        }
        if let Some(profile) = self.cached(steam_id) {
            return profile;
        }
        match self.fetch(steam_id).await {
            Ok(profile) => {
                self.profiles.insert(steam_id, profile.clone());
                profile
            }
            Err(e) => {
                log::warn!("Steam profile lookup for {} failed: {}", steam_id, e);
                let placeholder = SteamProfile::placeholder(steam_id);
                self.failures.insert(steam_id, placeholder.clone());
                placeholder
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: SteamId64 = SteamId64(76561197960290419);

    fn parse(json: &str) -> PlayerSummariesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_profile_from_summary() {
        let profile = profile_from_summaries(
            ID,
            parse(
                r#"{"response":{"players":[{
                    "steamid":"76561197960290419",
                    "personaname":"Sniper Main",
                    "avatarfull":"https://avatars.example/full.jpg",
                    "profileurl":"https://steamcommunity.com/id/snipermain/"
                }]}}"#,
            ),
        )
        .unwrap();
        assert_eq!(profile.persona_name, "Sniper Main");
        assert_eq!(profile.avatar_url, "https://avatars.example/full.jpg");
        assert_eq!(
            profile.profile_url.as_deref(),
            Some("https://steamcommunity.com/id/snipermain/")
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let profile =
            profile_from_summaries(ID, parse(r#"{"response":{"players":[{"personaname":""}]}}"#))
                .unwrap();
        assert_eq!(profile.persona_name, UNKNOWN_PERSONA_NAME);
        assert_eq!(profile.avatar_url, DEFAULT_AVATAR_URL);
        assert_eq!(profile.profile_url, None);
    }

    #[test]
    fn test_unknown_player_is_an_error() {
        let result = profile_from_summaries(ID, parse(r#"{"response":{}}"#));
        assert!(matches!(result, Err(SteamError::PlayerMissing(_))));
    }

    #[tokio::test]
    async fn test_disabled_lookup_returns_placeholder() {
        let service = SteamProfileService::new(&SteamConfig {
            api_key: String::new(),
            public_url: "http://127.0.0.1:8080".to_string(),
        })
        .unwrap();
        assert_eq!(service.get_profile(ID).await, SteamProfile::placeholder(ID));
        assert!(service.cached(ID).is_none());
    }

    #[tokio::test]
    async fn test_cached_profile_is_served_without_request() {
        let service = SteamProfileService::new(&SteamConfig {
            api_key: "key".to_string(),
            public_url: "http://127.0.0.1:8080".to_string(),
        })
        .unwrap();
        let profile = SteamProfile {
            steam_id: ID,
            persona_name: "Cached".to_string(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            profile_url: None,
        };
        service.profiles.insert(ID, profile.clone());
        assert_eq!(service.get_profile(ID).await, profile);
    }
}
