use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use mge_core::{duel::DuelSide, steam_id::legacy_to_steam64};

use crate::{
    domain::{
        RepoError, RepoRetrieveError,
        duel::{DuelRecord, DuelRepository},
        matchup::{MatchupRatingRepository, MatchupRatings, MatchupStats},
        player::{PlayerRepository, PlayerStats},
    },
    ports::steam_profile::{SteamProfile, SteamProfilePort},
    services::nickname_resolver::NicknameResolverService,
};

pub const RATING_HISTORY_DAYS: i64 = 30;
pub const PRACTICE_DUEL_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Nemesis {
    pub steam_id: String,
    pub nickname: String,
    pub duel_count: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub rating: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PracticeDuel {
    pub duel: DuelRecord,
    pub opponent_id: String,
    pub opponent_nick: String,
    pub won: bool,
}

#[derive(Clone, Debug)]
pub struct PlayerProfile {
    pub steam_id: String,
    pub nickname: String,
    pub stats: Option<PlayerStats>,
    pub steam_profile: Option<SteamProfile>,
    pub nemesis: Option<Nemesis>,
    pub rating_history: Vec<RatingPoint>,
    pub practice_duels: Vec<PracticeDuel>,
    pub matchup_ratings: MatchupRatings,
    pub matchup_stats: MatchupStats,
}

/// Rating after the last duel of each UTC day, read from the player's own slot.
pub fn daily_rating_history<'a>(
    steam_id: &str,
    duels: impl IntoIterator<Item = &'a DuelRecord>,
) -> Vec<RatingPoint> {
    let mut days: BTreeMap<NaiveDate, (i64, i32)> = BTreeMap::new();
    for duel in duels {
        let Some(rating) = duel.new_elo_for(steam_id) else {
            continue;
        };
        let Some(time) = DateTime::<Utc>::from_timestamp(duel.end_time, 0) else {
            continue;
        };
        let entry = days
            .entry(time.date_naive())
            .or_insert((duel.end_time, rating));
        if duel.end_time >= entry.0 {
            *entry = (duel.end_time, rating);
        }
    }
    days.into_iter()
        .map(|(date, (_, rating))| RatingPoint { date, rating })
        .collect()
}

#[async_trait::async_trait]
pub trait GetProfileUseCase {
    async fn get_profile(&self, steam_id: &str) -> PlayerProfile;
}

pub struct GetProfileUseCaseImpl<PR, DR, MR>
where
    PR: PlayerRepository,
    DR: DuelRepository,
    MR: MatchupRatingRepository,
{
    player_repository: Arc<PR>,
    duel_repository: Arc<DR>,
    matchup_repository: Arc<MR>,
    steam_profiles: Arc<dyn SteamProfilePort + Send + Sync + 'static>,
    nickname_resolver: Arc<dyn NicknameResolverService + Send + Sync + 'static>,
}

impl<PR, DR, MR> GetProfileUseCaseImpl<PR, DR, MR>
where
    PR: PlayerRepository,
    DR: DuelRepository,
    MR: MatchupRatingRepository,
{
    pub fn new(
        player_repository: Arc<PR>,
        duel_repository: Arc<DR>,
        matchup_repository: Arc<MR>,
        steam_profiles: Arc<dyn SteamProfilePort + Send + Sync + 'static>,
        nickname_resolver: Arc<dyn NicknameResolverService + Send + Sync + 'static>,
    ) -> Self {
        Self {
            player_repository,
            duel_repository,
            matchup_repository,
            steam_profiles,
            nickname_resolver,
        }
    }
}

impl<PR, DR, MR> GetProfileUseCaseImpl<PR, DR, MR>
where
    PR: PlayerRepository + Send + Sync + 'static,
    DR: DuelRepository + Send + Sync + 'static,
    MR: MatchupRatingRepository + Send + Sync + 'static,
{
    async fn stats(&self, steam_id: &str) -> Option<PlayerStats> {
        match self.player_repository.get_player(steam_id).await {
            Ok(stats) => Some(stats),
            Err(RepoRetrieveError::NotFound) => None,
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error getting stats of {}: {}", steam_id, e);
                None
            }
        }
    }

    async fn nemesis(&self, steam_id: &str) -> Option<Nemesis> {
        let opponent = match self.duel_repository.get_most_frequent_opponent(steam_id).await {
            Ok(opponent) => opponent?,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting nemesis of {}: {}", steam_id, e);
                return None;
            }
        };
        Some(Nemesis {
            nickname: self.nickname_resolver.resolve(&opponent.steam_id).await,
            steam_id: opponent.steam_id,
            duel_count: opponent.duel_count,
        })
    }

    async fn practice_duels(&self, steam_id: &str) -> Vec<PracticeDuel> {
        let duels = match self
            .duel_repository
            .get_practice_duels(steam_id, PRACTICE_DUEL_LIMIT)
            .await
        {
            Ok(duels) => duels,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting practice duels of {}: {}", steam_id, e);
                return Vec::new();
            }
        };
        let mut practice = Vec::with_capacity(duels.len());
        for duel in duels {
            let Some((side, _)) = duel.slot_of(steam_id) else {
                continue;
            };
            let opponent_id = match side {
                DuelSide::Winner => duel.loser.steam_id.clone(),
                DuelSide::Loser => duel.winner.steam_id.clone(),
            };
            practice.push(PracticeDuel {
                opponent_nick: self.nickname_resolver.resolve(&opponent_id).await,
                opponent_id,
                won: side == DuelSide::Winner,
                duel,
            });
        }
        practice
    }

    async fn matchup_ratings(&self, steam_id: &str) -> MatchupRatings {
        match self.matchup_repository.get_matchup_ratings(steam_id).await {
            Ok(ratings) => ratings,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting matchup ratings of {}: {}", steam_id, e);
                MatchupRatings::default()
            }
        }
    }

    async fn all_duels(&self, steam_id: &str) -> Vec<DuelRecord> {
        match self.duel_repository.get_player_duels(steam_id, None).await {
            Ok(duels) => duels,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting duels of {}: {}", steam_id, e);
                Vec::new()
            }
        }
    }

    async fn steam_profile(&self, steam_id: &str) -> Option<SteamProfile> {
        let steam64 = legacy_to_steam64(steam_id)?;
        Some(self.steam_profiles.get_profile(steam64).await)
    }
}

#[async_trait::async_trait]
impl<PR, DR, MR> GetProfileUseCase for GetProfileUseCaseImpl<PR, DR, MR>
where
    PR: PlayerRepository + Send + Sync + 'static,
    DR: DuelRepository + Send + Sync + 'static,
    MR: MatchupRatingRepository + Send + Sync + 'static,
{
    async fn get_profile(&self, steam_id: &str) -> PlayerProfile {
        let (nickname, stats, nemesis, practice_duels, matchup_ratings, duels, steam_profile) = tokio::join!(
            self.nickname_resolver.resolve(steam_id),
            self.stats(steam_id),
            self.nemesis(steam_id),
            self.practice_duels(steam_id),
            self.matchup_ratings(steam_id),
            self.all_duels(steam_id),
            self.steam_profile(steam_id),
        );

        let since = Utc::now().timestamp() - RATING_HISTORY_DAYS * 24 * 60 * 60;
        let rating_history =
            daily_rating_history(steam_id, duels.iter().filter(|d| d.end_time >= since));
        let matchup_stats = MatchupStats::from_duels(steam_id, &duels);

        PlayerProfile {
            steam_id: steam_id.to_string(),
            nickname,
            stats,
            steam_profile,
            nemesis,
            rating_history,
            practice_duels,
            matchup_ratings,
            matchup_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::duel::{PRACTICE_ARENA_PREFIX, PRACTICE_MAP_NAME},
        mocks::{MockSteamProfiles, MockStore, duel, player, slot, team_duel},
        services::nickname_resolver::NicknameResolverServiceImpl,
    };
    use mge_core::{SteamId64, TfClass, matchup::MatchupCounter};

    const DAY: i64 = 24 * 60 * 60;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn use_case(
        store: &MockStore,
        profiles: &MockSteamProfiles,
    ) -> GetProfileUseCaseImpl<MockStore, MockStore, MockStore> {
        let resolver = Arc::new(NicknameResolverServiceImpl::new(Arc::new(store.clone())));
        GetProfileUseCaseImpl::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(profiles.clone()),
            resolver,
        )
    }

    #[test]
    fn test_history_keeps_last_duel_of_day() {
        // 2023-11-14 22:13:20 UTC
        let base = 1_700_000_000;
        let duels = vec![
            duel(1, base - 3600, slot("me", "scout", 1500, 1510), slot("x", "scout", 1500, 1490)),
            duel(2, base, slot("x", "scout", 1490, 1502), slot("me", "scout", 1510, 1498)),
            duel(3, base + DAY, slot("me", "scout", 1498, 1507), slot("x", "scout", 1502, 1493)),
            duel(4, base + 2 * DAY, slot("y", "spy", 1500, 1510), slot("z", "spy", 1500, 1490)),
        ];
        assert_eq!(
            daily_rating_history("me", &duels),
            vec![
                RatingPoint { date: date(2023, 11, 14), rating: 1498 },
                RatingPoint { date: date(2023, 11, 15), rating: 1507 },
            ]
        );
    }

    #[test]
    fn test_history_reads_second_winner_slot() {
        let duels = vec![team_duel(
            1,
            1_700_000_000,
            (slot("a", "soldier", 1500, 1510), slot("me", "medic", 1600, 1630)),
            (slot("b", "scout", 1500, 1490), slot("c", "scout", 1500, 1490)),
        )];
        assert_eq!(daily_rating_history("me", &duels)[0].rating, 1630);
    }

    #[tokio::test]
    async fn test_profile_overview() {
        let me = "STEAM_0:1:12345";
        let store = MockStore::default();
        let profiles = MockSteamProfiles::default();
        store.add_player(player(me, Some("Me"), 1650, 3, 1));
        store.add_player(player("rival", Some("Rival"), 1600, 2, 2));
        let now = Utc::now().timestamp();
        store.add_duel(duel(1, now - 2 * DAY, slot(me, "scout", 1500, 1520), slot("rival", "soldier", 1500, 1480)));
        store.add_duel(duel(2, now - DAY, slot("rival", "soldier", 1480, 1500), slot(me, "scout", 1520, 1500)));
        store.add_duel(duel(3, now - 400 * DAY, slot(me, "scout", 1400, 1410), slot("another", "pyro", 1500, 1490)));
        let mut practice = duel(4, now - 3 * DAY, slot(me, "spy", 1500, 1650), slot("other", "sniper", 1500, 1490));
        practice.map_name = PRACTICE_MAP_NAME.to_string();
        practice.arena_name = format!("{} 1", PRACTICE_ARENA_PREFIX);
        store.add_duel(practice);
        store.add_matchup_rating(me, 1, 3, 1700);

        let profile = use_case(&store, &profiles).get_profile(me).await;
        assert_eq!(profile.nickname, "Me");
        assert_eq!(profile.stats.as_ref().map(|s| s.rating), Some(1650));
        assert_eq!(
            profile.nemesis,
            Some(Nemesis {
                steam_id: "rival".to_string(),
                nickname: "Rival".to_string(),
                duel_count: 2,
            })
        );
        assert_eq!(profile.rating_history.len(), 3);
        assert_eq!(profile.rating_history[0].rating, 1650);
        assert_eq!(profile.rating_history.last().map(|p| p.rating), Some(1500));

        assert_eq!(profile.practice_duels.len(), 1);
        assert_eq!(profile.practice_duels[0].opponent_id, "other");
        assert!(profile.practice_duels[0].won);

        assert_eq!(profile.matchup_ratings.get(TfClass::Scout, TfClass::Soldier), 1700);
        assert_eq!(
            profile.matchup_stats.get(TfClass::Scout, TfClass::Soldier),
            MatchupCounter { total: 2, wins: 1 }
        );

        let steam_profile = profile.steam_profile.unwrap();
        assert_eq!(steam_profile.steam_id, SteamId64(76561197960290419));
        assert_eq!(profiles.lookups().len(), 1);
    }

    #[tokio::test]
    async fn test_profile_without_stats_row() {
        let store = MockStore::default();
        let profiles = MockSteamProfiles::default();
        let profile = use_case(&store, &profiles).get_profile("not-a-steam-id").await;
        assert_eq!(profile.nickname, "not-a-steam-id");
        assert!(profile.stats.is_none());
        assert!(profile.nemesis.is_none());
        assert!(profile.rating_history.is_empty());
        assert!(profile.steam_profile.is_none());
        assert!(profiles.lookups().is_empty());
    }
}
