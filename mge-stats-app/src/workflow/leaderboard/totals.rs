use std::sync::Arc;

use crate::domain::{
    RepoError,
    duel::{DuelKind, DuelRepository},
    player::PlayerRepository,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverviewTotals {
    pub total_duels: usize,
    pub total_duels_2v2: usize,
    pub total_players: usize,
    pub highest_rating: Option<i32>,
}

#[async_trait::async_trait]
pub trait GetOverviewTotalsUseCase {
    async fn get_totals(&self) -> OverviewTotals;
}

pub struct GetOverviewTotalsUseCaseImpl<PR: PlayerRepository, DR: DuelRepository> {
    player_repository: Arc<PR>,
    duel_repository: Arc<DR>,
}

impl<PR: PlayerRepository, DR: DuelRepository> GetOverviewTotalsUseCaseImpl<PR, DR> {
    pub fn new(player_repository: Arc<PR>, duel_repository: Arc<DR>) -> Self {
        Self {
            player_repository,
            duel_repository,
        }
    }
}

fn or_log<T: Default>(result: Result<T, RepoError>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(RepoError::StorageError(e)) => {
            log::error!("Error counting {}: {}", what, e);
            T::default()
        }
    }
}

#[async_trait::async_trait]
impl<PR, DR> GetOverviewTotalsUseCase for GetOverviewTotalsUseCaseImpl<PR, DR>
where
    PR: PlayerRepository + Send + Sync + 'static,
    DR: DuelRepository + Send + Sync + 'static,
{
    async fn get_totals(&self) -> OverviewTotals {
        let (duels, duels_2v2, players, highest) = tokio::join!(
            self.duel_repository.count_duels(DuelKind::OneVsOne),
            self.duel_repository.count_duels(DuelKind::TwoVsTwo),
            self.player_repository.count_players(),
            self.player_repository.highest_rating(),
        );
        OverviewTotals {
            total_duels: or_log(duels, "1v1 duels"),
            total_duels_2v2: or_log(duels_2v2, "2v2 duels"),
            total_players: or_log(players, "players"),
            highest_rating: or_log(highest, "highest rating"),
        }
    }
}
