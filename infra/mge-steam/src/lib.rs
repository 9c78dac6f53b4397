use thiserror::Error;

pub mod openid;
pub mod profiles;

pub use openid::SteamOpenIdProvider;
pub use profiles::SteamProfileService;

const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum SteamError {
    #[error("invalid public url `{0}`")]
    InvalidPublicUrl(String),
    #[error("steam web api request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("steam web api returned no player for {0}")]
    PlayerMissing(String),
}

#[derive(Clone, Debug)]
pub struct SteamConfig {
    /// Web API key; empty disables profile lookups.
    pub api_key: String,
    /// Absolute url the OpenID callback returns to, also used as realm.
    pub public_url: String,
}

impl SteamConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("STEAM_API_KEY").unwrap_or_default();
        let public_url = std::env::var("MGE_PUBLIC_URL").unwrap_or_else(|_| {
            let port = std::env::var("MGE_HTTP_PORT")
                .ok()
                .and_then(|port| port.parse::<u16>().ok())
                .unwrap_or(DEFAULT_HTTP_PORT);
            format!("http://127.0.0.1:{}", port)
        });
        Self {
            api_key: api_key.trim().to_string(),
            public_url: public_url.trim().to_string(),
        }
    }

    pub fn profile_lookups_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}
