use std::sync::Arc;

use crate::domain::{
    PLAYERS_PER_PAGE, PaginatedResponse, Pagination, RepoError,
    player::{PlayerQuery, PlayerRepository, PlayerSort, PlayerStats},
};

#[async_trait::async_trait]
pub trait ListPlayersUseCase {
    async fn list_players(&self, page: usize, sort: PlayerSort)
    -> PaginatedResponse<PlayerStats>;
}

pub struct ListPlayersUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> ListPlayersUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> ListPlayersUseCase
    for ListPlayersUseCaseImpl<PR>
{
    async fn list_players(
        &self,
        page: usize,
        sort: PlayerSort,
    ) -> PaginatedResponse<PlayerStats> {
        let pagination = Pagination::new(page, PLAYERS_PER_PAGE);
        match self
            .player_repository
            .query_players(PlayerQuery { pagination, sort })
            .await
        {
            Ok(result) => result,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error querying players: {}", e);
                PaginatedResponse::empty(pagination)
            }
        }
    }
}
