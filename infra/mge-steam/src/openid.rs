use lazy_regex::regex_captures;
use mge_core::SteamId64;
use mge_stats_app::ports::identity::IdentityProviderPort;
use reqwest::Url;

use crate::{SteamConfig, SteamError};

pub const STEAM_OPENID_LOGIN: &str = "https://steamcommunity.com/openid/login";
const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// Extracts the 64-bit id from a Steam claimed-identity url.
pub fn steam_id_from_claimed(claimed: &str) -> Option<SteamId64> {
    let (_, id) =
        regex_captures!(r"^https?://steamcommunity\.com/openid/id/(7[0-9]{15,25})$", claimed)?;
    id.parse().ok()
}

pub struct SteamOpenIdProvider {
    login_url: String,
}

impl SteamOpenIdProvider {
    pub fn new(config: &SteamConfig) -> Result<Self, SteamError> {
        let return_to = Url::parse(&config.public_url)
            .map_err(|_| SteamError::InvalidPublicUrl(config.public_url.clone()))?;
        let login_url = Url::parse_with_params(
            STEAM_OPENID_LOGIN,
            &[
                ("openid.ns", OPENID_NS),
                ("openid.mode", "checkid_setup"),
                ("openid.return_to", return_to.as_str()),
                ("openid.realm", return_to.as_str()),
                ("openid.identity", IDENTIFIER_SELECT),
                ("openid.claimed_id", IDENTIFIER_SELECT),
            ],
        )
        .map_err(|_| SteamError::InvalidPublicUrl(config.public_url.clone()))?;
        Ok(Self {
            login_url: login_url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IdentityProviderPort for SteamOpenIdProvider {
    fn login_url(&self) -> String {
        self.login_url.clone()
    }

    async fn verify_callback(&self, params: &[(String, String)]) -> Option<SteamId64> {
        let value_of = |key: &str| {
            params
                .iter()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| v.as_str())
        };
        let claimed = value_of("openid.claimed_id").or_else(|| value_of("openid.identity"))?;
        steam_id_from_claimed(claimed)
    }
}
