use mge_core::SteamId64;

/// Redirect based third-party login.
#[async_trait::async_trait]
pub trait IdentityProviderPort {
    fn login_url(&self) -> String;
    /// Resolves the callback query into the authenticated id, `None` when rejected.
    async fn verify_callback(&self, params: &[(String, String)]) -> Option<SteamId64>;
}
