use std::sync::Arc;

use crate::{
    domain::{
        DUELS_PER_PAGE, PaginatedResponse, Pagination, RepoError,
        duel::{DuelQuery, DuelRepository, DuelSort},
    },
    services::nickname_resolver::NicknameResolverService,
    workflow::duels::{NamedDuel, name_duel},
};

/// A duel seen from one participant.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerDuel {
    pub named: NamedDuel,
    pub is_winner: bool,
    pub elo_change: Option<i32>,
}

#[async_trait::async_trait]
pub trait ListPlayerDuelsUseCase {
    async fn list_player_duels(&self, steam_id: &str, page: usize)
    -> PaginatedResponse<PlayerDuel>;
}

pub struct ListPlayerDuelsUseCaseImpl<DR: DuelRepository> {
    duel_repository: Arc<DR>,
    nickname_resolver: Arc<dyn NicknameResolverService + Send + Sync + 'static>,
}

impl<DR: DuelRepository> ListPlayerDuelsUseCaseImpl<DR> {
    pub fn new(
        duel_repository: Arc<DR>,
        nickname_resolver: Arc<dyn NicknameResolverService + Send + Sync + 'static>,
    ) -> Self {
        Self {
            duel_repository,
            nickname_resolver,
        }
    }
}

#[async_trait::async_trait]
impl<DR: DuelRepository + Send + Sync + 'static> ListPlayerDuelsUseCase
    for ListPlayerDuelsUseCaseImpl<DR>
{
    async fn list_player_duels(
        &self,
        steam_id: &str,
        page: usize,
    ) -> PaginatedResponse<PlayerDuel> {
        let pagination = Pagination::new(page, DUELS_PER_PAGE);
        let query = DuelQuery {
            pagination,
            sort: DuelSort::default(),
            participant: Some(steam_id.to_string()),
        };
        let result = match self.duel_repository.query_duels(query).await {
            Ok(result) => result,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error querying duels of {}: {}", steam_id, e);
                return PaginatedResponse::empty(pagination);
            }
        };

        let mut items = Vec::with_capacity(result.items.len());
        for duel in result.items {
            let is_winner = duel.is_winner(steam_id);
            let elo_change = duel.elo_change_for(steam_id);
            items.push(PlayerDuel {
                named: name_duel(self.nickname_resolver.as_ref(), duel).await,
                is_winner,
                elo_change,
            });
        }
        PaginatedResponse {
            items,
            total_count: result.total_count,
            pagination: result.pagination,
        }
    }
}
