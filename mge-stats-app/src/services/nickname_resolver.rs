use std::{sync::Arc, time::Duration};

use crate::domain::{RepoRetrieveError, player::PlayerRepository};

const NICKNAME_CACHE_CAPACITY: u64 = 10_000;
const NICKNAME_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[async_trait::async_trait]
pub trait NicknameResolverService {
    /// Display name of a player, the id itself when no name is known.
    async fn resolve(&self, steam_id: &str) -> String;
}

pub struct NicknameResolverServiceImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
    cache: moka::sync::Cache<String, String>,
}

impl<PR: PlayerRepository> NicknameResolverServiceImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self {
            player_repository,
            cache: moka::sync::Cache::builder()
                .max_capacity(NICKNAME_CACHE_CAPACITY)
                .time_to_live(NICKNAME_CACHE_TTL)
                .build(),
        }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> NicknameResolverService
    for NicknameResolverServiceImpl<PR>
{
    async fn resolve(&self, steam_id: &str) -> String {
        if steam_id.is_empty() {
            return String::new();
        }
        if let Some(nick) = self.cache.get(steam_id) {
            return nick;
        }
        let nick = match self.player_repository.get_player(steam_id).await {
            Ok(player) => player.display_name().to_string(),
            Err(RepoRetrieveError::NotFound) => steam_id.to_string(),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error resolving nickname for {}: {}", steam_id, e);
                return steam_id.to_string();
            }
        };
        self.cache.insert(steam_id.to_string(), nick.clone());
        nick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockStore, player};

    #[tokio::test]
    async fn test_resolve_known_player() {
        let store = MockStore::default();
        store.add_player(player("STEAM_0:0:1", Some("Tobi"), 1600, 10, 5));
        let resolver = NicknameResolverServiceImpl::new(Arc::new(store.clone()));

        assert_eq!(resolver.resolve("STEAM_0:0:1").await, "Tobi");
        assert_eq!(resolver.resolve("STEAM_0:0:1").await, "Tobi");
        assert_eq!(store.player_lookups(), 1);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_id() {
        let store = MockStore::default();
        store.add_player(player("STEAM_0:0:2", None, 1500, 0, 0));
        let resolver = NicknameResolverServiceImpl::new(Arc::new(store.clone()));

        assert_eq!(resolver.resolve("STEAM_0:0:2").await, "STEAM_0:0:2");
        assert_eq!(resolver.resolve("STEAM_0:1:99").await, "STEAM_0:1:99");
        assert_eq!(resolver.resolve("").await, "");
    }

    #[tokio::test]
    async fn test_storage_errors_are_not_cached() {
        let store = MockStore::default();
        store.add_player(player("STEAM_0:0:3", Some("Ash"), 1500, 0, 0));
        store.set_failing(true);
        let resolver = NicknameResolverServiceImpl::new(Arc::new(store.clone()));

        assert_eq!(resolver.resolve("STEAM_0:0:3").await, "STEAM_0:0:3");
        store.set_failing(false);
        assert_eq!(resolver.resolve("STEAM_0:0:3").await, "Ash");
    }
}
