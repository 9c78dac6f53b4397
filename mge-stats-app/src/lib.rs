use std::sync::Arc;

use crate::{
    domain::{
        StorageHealth, activity::ActivityRepository, duel::DuelRepository,
        matchup::MatchupRatingRepository, player::PlayerRepository,
    },
    ports::{identity::IdentityProviderPort, steam_profile::SteamProfilePort},
    services::nickname_resolver::{NicknameResolverService, NicknameResolverServiceImpl},
    workflow::{
        account::{
            login::{SteamLoginUseCase, SteamLoginUseCaseImpl},
            viewer::{GetViewerUseCase, GetViewerUseCaseImpl},
        },
        activity::{
            daily::{GetDailyActivityUseCase, GetDailyActivityUseCaseImpl},
            heatmap::{GetActivityHeatmapUseCase, GetActivityHeatmapUseCaseImpl},
        },
        duels::{
            details::{GetDuelUseCase, GetDuelUseCaseImpl},
            list::{ListDuelsUseCase, ListDuelsUseCaseImpl},
        },
        leaderboard::{
            list::{ListPlayersUseCase, ListPlayersUseCaseImpl},
            search::{SearchPlayersUseCase, SearchPlayersUseCaseImpl},
            totals::{GetOverviewTotalsUseCase, GetOverviewTotalsUseCaseImpl},
        },
        profile::{
            duels::{ListPlayerDuelsUseCase, ListPlayerDuelsUseCaseImpl},
            overview::{GetProfileUseCase, GetProfileUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod services;
pub mod workflow;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub struct Application {
    pub player_list_use_case: Box<dyn ListPlayersUseCase + Send + Sync + 'static>,
    pub player_search_use_case: Box<dyn SearchPlayersUseCase + Send + Sync + 'static>,
    pub overview_totals_use_case: Box<dyn GetOverviewTotalsUseCase + Send + Sync + 'static>,

    pub duel_list_use_case: Box<dyn ListDuelsUseCase + Send + Sync + 'static>,
    pub duel_get_use_case: Box<dyn GetDuelUseCase + Send + Sync + 'static>,

    pub profile_get_use_case: Box<dyn GetProfileUseCase + Send + Sync + 'static>,
    pub profile_duels_use_case: Box<dyn ListPlayerDuelsUseCase + Send + Sync + 'static>,

    pub activity_heatmap_use_case: Box<dyn GetActivityHeatmapUseCase + Send + Sync + 'static>,
    pub activity_daily_use_case: Box<dyn GetDailyActivityUseCase + Send + Sync + 'static>,

    pub account_login_use_case: Box<dyn SteamLoginUseCase + Send + Sync + 'static>,
    pub account_viewer_use_case: Box<dyn GetViewerUseCase + Send + Sync + 'static>,

    pub nickname_resolver_service: Arc<dyn NicknameResolverService + Send + Sync + 'static>,
    pub storage_health: Arc<dyn StorageHealth + Send + Sync + 'static>,
}

pub fn build_application<
    PR: PlayerRepository + Send + Sync + 'static,
    DR: DuelRepository + Send + Sync + 'static,
    MR: MatchupRatingRepository + Send + Sync + 'static,
    AR: ActivityRepository + Send + Sync + 'static,
    SP: SteamProfilePort + Send + Sync + 'static,
    IP: IdentityProviderPort + Send + Sync + 'static,
    SH: StorageHealth + Send + Sync + 'static,
>(
    player_repository: Arc<PR>,
    duel_repository: Arc<DR>,
    matchup_repository: Arc<MR>,
    activity_repository: Arc<AR>,
    steam_profile_port: Arc<SP>,
    identity_provider: Arc<IP>,
    storage_health: Arc<SH>,
) -> Application {
    let nickname_resolver_service: Arc<dyn NicknameResolverService + Send + Sync + 'static> =
        Arc::new(NicknameResolverServiceImpl::new(player_repository.clone()));

    Application {
        player_list_use_case: Box::new(ListPlayersUseCaseImpl::new(player_repository.clone())),
        player_search_use_case: Box::new(SearchPlayersUseCaseImpl::new(
            player_repository.clone(),
            duel_repository.clone(),
        )),
        overview_totals_use_case: Box::new(GetOverviewTotalsUseCaseImpl::new(
            player_repository.clone(),
            duel_repository.clone(),
        )),

        duel_list_use_case: Box::new(ListDuelsUseCaseImpl::new(
            duel_repository.clone(),
            nickname_resolver_service.clone(),
        )),
        duel_get_use_case: Box::new(GetDuelUseCaseImpl::new(
            duel_repository.clone(),
            nickname_resolver_service.clone(),
        )),

        profile_get_use_case: Box::new(GetProfileUseCaseImpl::new(
            player_repository.clone(),
            duel_repository.clone(),
            matchup_repository.clone(),
            steam_profile_port.clone(),
            nickname_resolver_service.clone(),
        )),
        profile_duels_use_case: Box::new(ListPlayerDuelsUseCaseImpl::new(
            duel_repository.clone(),
            nickname_resolver_service.clone(),
        )),

        activity_heatmap_use_case: Box::new(GetActivityHeatmapUseCaseImpl::new(
            activity_repository.clone(),
        )),
        activity_daily_use_case: Box::new(GetDailyActivityUseCaseImpl::new(
            activity_repository.clone(),
        )),

        account_login_use_case: Box::new(SteamLoginUseCaseImpl::new(identity_provider)),
        account_viewer_use_case: Box::new(GetViewerUseCaseImpl::new(
            player_repository.clone(),
            steam_profile_port.clone(),
        )),

        nickname_resolver_service,
        storage_health,
    }
}
