use mge_core::SteamId64;

pub const UNKNOWN_PERSONA_NAME: &str = "Unknown";
pub const DEFAULT_AVATAR_URL: &str = "https://steamcdn-a.akamaihd.net/steamcommunity/public/images/avatars/fe/fef49e7fa7e1997310d705b2a6158ff8dc1cdfeb_full.jpg";

#[derive(Clone, Debug, PartialEq)]
pub struct SteamProfile {
    pub steam_id: SteamId64,
    pub persona_name: String,
    pub avatar_url: String,
    pub profile_url: Option<String>,
}

impl SteamProfile {
    pub fn placeholder(steam_id: SteamId64) -> Self {
        Self {
            steam_id,
            persona_name: UNKNOWN_PERSONA_NAME.to_string(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            profile_url: None,
        }
    }
}

/// Public profile lookup; unreachable or disabled lookups yield a placeholder.
#[async_trait::async_trait]
pub trait SteamProfilePort {
    async fn get_profile(&self, steam_id: SteamId64) -> SteamProfile;
}
