use std::sync::Arc;

use crate::{
    domain::{
        RepoRetrieveError,
        duel::{DuelKind, DuelRepository},
    },
    services::nickname_resolver::NicknameResolverService,
    workflow::duels::{NamedDuel, name_duel},
};

#[async_trait::async_trait]
pub trait GetDuelUseCase {
    async fn get_duel(&self, kind: DuelKind, id: i64) -> Option<NamedDuel>;
}

pub struct GetDuelUseCaseImpl<DR: DuelRepository> {
    duel_repository: Arc<DR>,
    nickname_resolver: Arc<dyn NicknameResolverService + Send + Sync + 'static>,
}

impl<DR: DuelRepository> GetDuelUseCaseImpl<DR> {
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
impl<DR: DuelRepository + Send + Sync + 'static> GetDuelUseCase for GetDuelUseCaseImpl<DR> {
    async fn get_duel(&self, kind: DuelKind, id: i64) -> Option<NamedDuel> {
        match self.duel_repository.get_duel(kind, id).await {
            Ok(duel) => Some(name_duel(self.nickname_resolver.as_ref(), duel).await),
            Err(RepoRetrieveError::NotFound) => None,
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error getting {} duel {}: {}", kind, id, e);
                None
            }
        }
    }
}
