use std::sync::Arc;

use mge_core::{LegacySteamId, SteamId64};

use crate::{
    domain::{
        RepoRetrieveError,
        player::{PlayerRepository, PlayerStats},
    },
    ports::steam_profile::{SteamProfile, SteamProfilePort},
};

/// The logged-in user as shown in the page header.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSummary {
    pub steam_id64: SteamId64,
    pub legacy_id: LegacySteamId,
    pub profile: SteamProfile,
    pub stats: Option<PlayerStats>,
}

#[async_trait::async_trait]
pub trait GetViewerUseCase {
    async fn get_viewer(&self, steam_id: SteamId64) -> Option<ViewerSummary>;
}

pub struct GetViewerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
    steam_profiles: Arc<dyn SteamProfilePort + Send + Sync + 'static>,
}

impl<PR: PlayerRepository> GetViewerUseCaseImpl<PR> {
    pub fn new(
        player_repository: Arc<PR>,
        steam_profiles: Arc<dyn SteamProfilePort + Send + Sync + 'static>,
    ) -> Self {
        Self {
            player_repository,
            steam_profiles,
        }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> GetViewerUseCase for GetViewerUseCaseImpl<PR> {
    async fn get_viewer(&self, steam_id: SteamId64) -> Option<ViewerSummary> {
        let legacy_id = steam_id.to_legacy()?;
        let legacy = legacy_id.to_string();
        let (profile, stats) = tokio::join!(
            self.steam_profiles.get_profile(steam_id),
            self.player_repository.get_player(&legacy),
        );
        let stats = match stats {
            Ok(stats) => Some(stats),
            Err(RepoRetrieveError::NotFound) => None,
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error getting stats of viewer {}: {}", legacy, e);
                None
            }
        };
        Some(ViewerSummary {
            steam_id64: steam_id,
            legacy_id,
            profile,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockSteamProfiles, MockStore, player};

    #[tokio::test]
    async fn test_viewer_summary() {
        let store = MockStore::default();
        store.add_player(player("STEAM_0:1:12345", Some("Viewer"), 1720, 9, 3));
        let profiles = MockSteamProfiles::default();
        let use_case = GetViewerUseCaseImpl::new(Arc::new(store), Arc::new(profiles.clone()));

        let viewer = use_case
            .get_viewer(SteamId64(76561197960290419))
            .await
            .unwrap();
        assert_eq!(viewer.legacy_id.to_string(), "STEAM_0:1:12345");
        assert_eq!(viewer.profile.persona_name, "persona-76561197960290419");
        assert_eq!(viewer.stats.map(|s| s.rating), Some(1720));
        assert_eq!(profiles.lookups(), vec![SteamId64(76561197960290419)]);
    }

    #[tokio::test]
    async fn test_viewer_without_stats() {
        let use_case = GetViewerUseCaseImpl::new(
            Arc::new(MockStore::default()),
            Arc::new(MockSteamProfiles::default()),
        );
        let viewer = use_case
            .get_viewer(SteamId64(76561197960265728))
            .await
            .unwrap();
        assert_eq!(viewer.legacy_id.to_string(), "STEAM_0:0:0");
        assert!(viewer.stats.is_none());
        assert!(use_case.get_viewer(SteamId64(5)).await.is_none());
    }
}
