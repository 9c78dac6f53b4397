use std::sync::Arc;

use mge_core::rating::DEFAULT_RATING;

use crate::domain::{
    RepoError, SEARCH_PAGE_LIMIT, SEARCH_SUGGESTION_LIMIT,
    duel::DuelRepository,
    player::{PlayerRepository, PlayerSearchQuery, PlayerSort, PlayerStats},
};

#[async_trait::async_trait]
pub trait SearchPlayersUseCase {
    /// Short relevance ordered list for the search-as-you-type box.
    async fn suggest(&self, text: &str, sort: PlayerSort) -> Vec<PlayerStats>;
    /// Full result list; falls back to duel participants when no stats row matches.
    async fn search(&self, text: &str, sort: PlayerSort) -> Vec<PlayerStats>;
}

pub struct SearchPlayersUseCaseImpl<PR: PlayerRepository, DR: DuelRepository> {
    player_repository: Arc<PR>,
    duel_repository: Arc<DR>,
}

impl<PR: PlayerRepository, DR: DuelRepository> SearchPlayersUseCaseImpl<PR, DR> {
    pub fn new(player_repository: Arc<PR>, duel_repository: Arc<DR>) -> Self {
        Self {
            player_repository,
            duel_repository,
        }
    }
}

impl<PR, DR> SearchPlayersUseCaseImpl<PR, DR>
where
    PR: PlayerRepository + Send + Sync + 'static,
    DR: DuelRepository + Send + Sync + 'static,
{
    async fn search_stats(&self, text: &str, limit: usize, sort: PlayerSort) -> Vec<PlayerStats> {
        let query = PlayerSearchQuery {
            text: text.to_string(),
            limit,
            sort,
        };
        match self.player_repository.search_players(query).await {
            Ok(players) => players,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error searching players for '{}': {}", text, e);
                Vec::new()
            }
        }
    }

    async fn search_duel_participants(&self, text: &str) -> Vec<PlayerStats> {
        let ids = match self
            .duel_repository
            .search_participants(text, SEARCH_PAGE_LIMIT)
            .await
        {
            Ok(ids) => ids,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error searching duel participants for '{}': {}", text, e);
                return Vec::new();
            }
        };
        if ids.is_empty() {
            return Vec::new();
        }
        let known = match self.player_repository.get_players_by_ids(&ids).await {
            Ok(players) => players,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error loading duel participants: {}", e);
                Vec::new()
            }
        };
        ids.into_iter()
            .map(|steam_id| {
                known
                    .iter()
                    .find(|p| p.steam_id == steam_id)
                    .cloned()
                    .unwrap_or(PlayerStats {
                        steam_id,
                        name: None,
                        rating: DEFAULT_RATING,
                        wins: 0,
                        losses: 0,
                    })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<PR, DR> SearchPlayersUseCase for SearchPlayersUseCaseImpl<PR, DR>
where
    PR: PlayerRepository + Send + Sync + 'static,
    DR: DuelRepository + Send + Sync + 'static,
{
    async fn suggest(&self, text: &str, sort: PlayerSort) -> Vec<PlayerStats> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        self.search_stats(text, SEARCH_SUGGESTION_LIMIT, sort).await
    }

    async fn search(&self, text: &str, sort: PlayerSort) -> Vec<PlayerStats> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        let players = self.search_stats(text, SEARCH_PAGE_LIMIT, sort).await;
        if !players.is_empty() {
            return players;
        }
        log::debug!("No stats match for '{}', searching duel tables", text);
        self.search_duel_participants(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockStore, duel, player, slot};

    fn store() -> MockStore {
        let store = MockStore::default();
        store.add_player(player("STEAM_0:0:11", Some("Scoutmaster"), 1800, 40, 10));
        store.add_player(player("STEAM_0:0:12", Some("Scout"), 1600, 20, 20));
        store.add_player(player("STEAM_0:1:13", Some("Soldier"), 1700, 5, 5));
        store
    }

    #[tokio::test]
    async fn test_exact_name_ranks_first() {
        let store = store();
        let use_case = SearchPlayersUseCaseImpl::new(Arc::new(store.clone()), Arc::new(store));

        let results = use_case.suggest("Scout", PlayerSort::default()).await;
        let names: Vec<&str> = results.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["Scout", "Scoutmaster"]);
    }

    #[tokio::test]
    async fn test_blank_query_returns_nothing() {
        let store = store();
        let use_case = SearchPlayersUseCaseImpl::new(Arc::new(store.clone()), Arc::new(store));
        assert!(use_case.suggest("   ", PlayerSort::default()).await.is_empty());
        assert!(use_case.search("", PlayerSort::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_are_limited() {
        let store = MockStore::default();
        for i in 0..20 {
            store.add_player(player(&format!("STEAM_0:0:{}", i), Some("demo"), 1500, 0, 0));
        }
        let use_case = SearchPlayersUseCaseImpl::new(Arc::new(store.clone()), Arc::new(store));
        assert_eq!(
            use_case.suggest("demo", PlayerSort::default()).await.len(),
            SEARCH_SUGGESTION_LIMIT
        );
        assert_eq!(use_case.search("demo", PlayerSort::default()).await.len(), 20);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_duel_participants() {
        let store = MockStore::default();
        store.add_player(player("STEAM_0:1:555", Some("Pyro"), 1550, 3, 1));
        store.add_duel(duel(
            1,
            1_700_000_000,
            slot("STEAM_0:1:555", "pyro", 1500, 1510),
            slot("STEAM_0:0:777", "spy", 1500, 1490),
        ));
        let use_case = SearchPlayersUseCaseImpl::new(Arc::new(store.clone()), Arc::new(store));

        let results = use_case.search("1:555", PlayerSort::default()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name(), "Pyro");

        let results = use_case.search("0:777", PlayerSort::default()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].steam_id, "STEAM_0:0:777");
        assert_eq!(results[0].rating, DEFAULT_RATING);
        assert_eq!(results[0].games(), 0);

        assert!(use_case.search("nobody", PlayerSort::default()).await.is_empty());
    }
}
