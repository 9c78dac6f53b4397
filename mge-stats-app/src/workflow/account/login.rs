use std::sync::Arc;

use mge_core::SteamId64;

use crate::ports::identity::IdentityProviderPort;

#[async_trait::async_trait]
pub trait SteamLoginUseCase {
    fn login_url(&self) -> String;
    /// Whether the query carries an identity provider callback at all.
    fn is_callback(&self, params: &[(String, String)]) -> bool;
    async fn complete_login(&self, params: &[(String, String)]) -> Option<SteamId64>;
}

pub struct SteamLoginUseCaseImpl<IP: IdentityProviderPort> {
    identity_provider: Arc<IP>,
}

impl<IP: IdentityProviderPort> SteamLoginUseCaseImpl<IP> {
    pub fn new(identity_provider: Arc<IP>) -> Self {
        Self { identity_provider }
    }
}

#[async_trait::async_trait]
impl<IP: IdentityProviderPort + Send + Sync + 'static> SteamLoginUseCase
    for SteamLoginUseCaseImpl<IP>
{
    fn login_url(&self) -> String {
        self.identity_provider.login_url()
    }

    fn is_callback(&self, params: &[(String, String)]) -> bool {
        params.iter().any(|(key, _)| key.starts_with("openid."))
    }

    async fn complete_login(&self, params: &[(String, String)]) -> Option<SteamId64> {
        let steam_id = self.identity_provider.verify_callback(params).await;
        match steam_id {
            Some(id) => log::info!("Steam login for {}", id),
            None => log::warn!("Rejected Steam login callback"),
        }
        steam_id
    }
}
