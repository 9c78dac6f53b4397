use std::sync::Arc;

use crate::{
    domain::{
        DUELS_PER_PAGE, PaginatedResponse, Pagination, RepoError,
        duel::{DuelQuery, DuelRepository, DuelSort},
    },
    services::nickname_resolver::NicknameResolverService,
    workflow::duels::{NamedDuel, name_duels},
};

#[async_trait::async_trait]
pub trait ListDuelsUseCase {
    /// Combined 1v1 and 2v2 history of the whole server.
    async fn list_duels(&self, page: usize, sort: DuelSort) -> PaginatedResponse<NamedDuel>;
}

pub struct ListDuelsUseCaseImpl<DR: DuelRepository> {
    duel_repository: Arc<DR>,
    nickname_resolver: Arc<dyn NicknameResolverService + Send + Sync + 'static>,
}

impl<DR: DuelRepository> ListDuelsUseCaseImpl<DR> {
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
impl<DR: DuelRepository + Send + Sync + 'static> ListDuelsUseCase for ListDuelsUseCaseImpl<DR> {
    async fn list_duels(&self, page: usize, sort: DuelSort) -> PaginatedResponse<NamedDuel> {
        let pagination = Pagination::new(page, DUELS_PER_PAGE);
        let query = DuelQuery {
            pagination,
            sort,
            participant: None,
        };
        let result = match self.duel_repository.query_duels(query).await {
            Ok(result) => result,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error querying duels: {}", e);
                return PaginatedResponse::empty(pagination);
            }
        };
        let named = name_duels(self.nickname_resolver.as_ref(), result.items).await;
        PaginatedResponse {
            items: named,
            total_count: result.total_count,
            pagination: result.pagination,
        }
    }
}
