use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use mge_core::{
    SteamId64,
    duel::{DuelKind, DuelRecord, DuelSlot},
    matchup::MatchupRatings,
};

use crate::{
    domain::{
        PaginatedResponse, RepoError, RepoRetrieveError, SortOrder, StorageHealth,
        activity::ActivityRepository,
        duel::{
            DuelQuery, DuelRepository, DuelSortBy, OpponentCount, PRACTICE_ARENA_PREFIX,
            PRACTICE_MAP_NAME,
        },
        matchup::MatchupRatingRepository,
        player::{PlayerQuery, PlayerRepository, PlayerSearchQuery, PlayerSortBy, PlayerStats},
    },
    ports::{
        identity::IdentityProviderPort,
        steam_profile::{SteamProfile, SteamProfilePort},
    },
};

pub fn player(
    steam_id: &str,
    name: Option<&str>,
    rating: i32,
    wins: i32,
    losses: i32,
) -> PlayerStats {
    PlayerStats {
        steam_id: steam_id.to_string(),
        name: name.map(str::to_string),
        rating,
        wins,
        losses,
    }
}

pub fn slot(steam_id: &str, class: &str, previous: i32, new: i32) -> DuelSlot {
    DuelSlot {
        steam_id: steam_id.to_string(),
        class: class.to_string(),
        previous_elo: Some(previous),
        new_elo: Some(new),
    }
}

pub fn duel(id: i64, end_time: i64, winner: DuelSlot, loser: DuelSlot) -> DuelRecord {
    DuelRecord {
        kind: DuelKind::OneVsOne,
        id,
        end_time,
        winner,
        loser,
        winner2: None,
        loser2: None,
        winner_score: 20,
        loser_score: 10,
        map_name: "mge_training_v8_beta4b".to_string(),
        arena_name: "Badlands Middle".to_string(),
    }
}

pub fn team_duel(
    id: i64,
    end_time: i64,
    winners: (DuelSlot, DuelSlot),
    losers: (DuelSlot, DuelSlot),
) -> DuelRecord {
    DuelRecord {
        kind: DuelKind::TwoVsTwo,
        winner2: Some(winners.1),
        loser2: Some(losers.1),
        ..duel(id, end_time, winners.0, losers.0)
    }
}

fn utc(end_time: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(end_time, 0).unwrap_or_default()
}

#[derive(Default)]
struct MockStoreInner {
    players: Vec<PlayerStats>,
    duels: Vec<DuelRecord>,
    matchup_rows: Vec<(String, i32, i32, i32)>,
    failing: bool,
    player_lookups: usize,
}

/// In-memory stand-in for every repository trait.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<MockStoreInner>>,
}

impl MockStore {
    pub fn add_player(&self, player: PlayerStats) {
        self.inner.lock().unwrap().players.push(player);
    }

    pub fn add_duel(&self, duel: DuelRecord) {
        self.inner.lock().unwrap().duels.push(duel);
    }

    pub fn add_matchup_rating(&self, steam_id: &str, mine: i32, theirs: i32, rating: i32) {
        self.inner
            .lock()
            .unwrap()
            .matchup_rows
            .push((steam_id.to_string(), mine, theirs, rating));
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    pub fn player_lookups(&self) -> usize {
        self.inner.lock().unwrap().player_lookups
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.inner.lock().unwrap().failing {
            Err(RepoError::StorageError("mock storage failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn player_duels(&self, steam_id: &str) -> Vec<DuelRecord> {
        let mut duels: Vec<DuelRecord> = self
            .inner
            .lock()
            .unwrap()
            .duels
            .iter()
            .filter(|d| d.involves(steam_id))
            .cloned()
            .collect();
        duels.sort_by_key(|d| d.end_time);
        duels
    }
}

fn player_sort_key(player: &PlayerStats, by: PlayerSortBy) -> f64 {
    match by {
        PlayerSortBy::Rating | PlayerSortBy::LastDuel => player.rating as f64,
        PlayerSortBy::Wins => player.wins as f64,
        PlayerSortBy::Losses => player.losses as f64,
        PlayerSortBy::WinRate => player.win_rate(),
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockStore {
    async fn get_player(&self, steam_id: &str) -> Result<PlayerStats, RepoRetrieveError> {
        let mut inner = self.inner.lock().unwrap();
        inner.player_lookups += 1;
        if inner.failing {
            return Err(RepoRetrieveError::StorageError("mock".to_string()));
        }
        inner
            .players
            .iter()
            .find(|p| p.steam_id == steam_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_players_by_ids(&self, steam_ids: &[String]) -> Result<Vec<PlayerStats>, RepoError> {
        self.check()?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .players
            .iter()
            .filter(|p| steam_ids.contains(&p.steam_id))
            .cloned()
            .collect())
    }

    async fn query_players(
        &self,
        query: PlayerQuery,
    ) -> Result<PaginatedResponse<PlayerStats>, RepoError> {
        self.check()?;
        let mut players = self.inner.lock().unwrap().players.clone();
        players.sort_by(|a, b| {
            let ord = player_sort_key(a, query.sort.by).total_cmp(&player_sort_key(b, query.sort.by));
            match query.sort.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        let total_count = players.len();
        let items = players
            .into_iter()
            .skip(query.pagination.offset())
            .take(query.pagination.limit())
            .collect();
        Ok(PaginatedResponse {
            items,
            total_count,
            pagination: query.pagination,
        })
    }

    async fn search_players(
        &self,
        query: PlayerSearchQuery,
    ) -> Result<Vec<PlayerStats>, RepoError> {
        self.check()?;
        let text = query.text.as_str();
        let relevance = |p: &PlayerStats| {
            let name = p.name.as_deref().unwrap_or_default();
            if name == text {
                1
            } else if name.contains(text) {
                2
            } else if p.steam_id == text {
                3
            } else {
                4
            }
        };
        let mut players: Vec<PlayerStats> = self
            .inner
            .lock()
            .unwrap()
            .players
            .iter()
            .filter(|p| {
                p.name.as_deref().is_some_and(|n| n.contains(text)) || p.steam_id.contains(text)
            })
            .cloned()
            .collect();
        players.sort_by_key(|p| (relevance(p), -p.rating));
        players.truncate(query.limit);
        Ok(players)
    }

    async fn count_players(&self) -> Result<usize, RepoError> {
        self.check()?;
        Ok(self.inner.lock().unwrap().players.len())
    }

    async fn highest_rating(&self) -> Result<Option<i32>, RepoError> {
        self.check()?;
        Ok(self.inner.lock().unwrap().players.iter().map(|p| p.rating).max())
    }
}

#[async_trait::async_trait]
impl DuelRepository for MockStore {
    async fn query_duels(
        &self,
        query: DuelQuery,
    ) -> Result<PaginatedResponse<DuelRecord>, RepoError> {
        self.check()?;
        let mut duels: Vec<DuelRecord> = self
            .inner
            .lock()
            .unwrap()
            .duels
            .iter()
            .filter(|d| query.participant.as_deref().is_none_or(|p| d.involves(p)))
            .cloned()
            .collect();
        duels.sort_by(|a, b| {
            let ord = match query.sort.by {
                DuelSortBy::EndTime => a.end_time.cmp(&b.end_time),
                DuelSortBy::Id => a.id.cmp(&b.id),
                DuelSortBy::Map => a.map_name.cmp(&b.map_name),
                DuelSortBy::Arena => a.arena_name.cmp(&b.arena_name),
            };
            match query.sort.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        let total_count = duels.len();
        let items = duels
            .into_iter()
            .skip(query.pagination.offset())
            .take(query.pagination.limit())
            .collect();
        Ok(PaginatedResponse {
            items,
            total_count,
            pagination: query.pagination,
        })
    }

    async fn get_duel(&self, kind: DuelKind, id: i64) -> Result<DuelRecord, RepoRetrieveError> {
        self.check()
            .map_err(|RepoError::StorageError(e)| RepoRetrieveError::StorageError(e))?;
        self.inner
            .lock()
            .unwrap()
            .duels
            .iter()
            .find(|d| d.kind == kind && d.id == id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn count_duels(&self, kind: DuelKind) -> Result<usize, RepoError> {
        self.check()?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .duels
            .iter()
            .filter(|d| d.kind == kind)
            .count())
    }

    async fn get_player_duels(
        &self,
        steam_id: &str,
        since: Option<i64>,
    ) -> Result<Vec<DuelRecord>, RepoError> {
        self.check()?;
        Ok(self
            .player_duels(steam_id)
            .into_iter()
            .filter(|d| since.is_none_or(|s| d.end_time >= s))
            .collect())
    }

    async fn get_most_frequent_opponent(
        &self,
        steam_id: &str,
    ) -> Result<Option<OpponentCount>, RepoError> {
        self.check()?;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for d in self.player_duels(steam_id) {
            if d.kind != DuelKind::OneVsOne || d.winner.steam_id == d.loser.steam_id {
                continue;
            }
            let opponent = if d.winner.steam_id == steam_id {
                &d.loser.steam_id
            } else {
                &d.winner.steam_id
            };
            *counts.entry(opponent.clone()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .max_by_key(|(id, count)| (*count, std::cmp::Reverse(id.clone())))
            .map(|(steam_id, duel_count)| OpponentCount {
                steam_id,
                duel_count,
            }))
    }

    async fn get_practice_duels(
        &self,
        steam_id: &str,
        limit: usize,
    ) -> Result<Vec<DuelRecord>, RepoError> {
        self.check()?;
        let mut duels: Vec<DuelRecord> = self
            .player_duels(steam_id)
            .into_iter()
            .filter(|d| {
                d.kind == DuelKind::OneVsOne
                    && d.map_name == PRACTICE_MAP_NAME
                    && d.arena_name.starts_with(PRACTICE_ARENA_PREFIX)
            })
            .collect();
        duels.reverse();
        duels.truncate(limit);
        Ok(duels)
    }

    async fn search_participants(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<String>, RepoError> {
        self.check()?;
        let ids: BTreeSet<String> = self
            .inner
            .lock()
            .unwrap()
            .duels
            .iter()
            .flat_map(|d| d.participants().map(|s| s.steam_id.clone()).collect::<Vec<_>>())
            .filter(|id| id.contains(text))
            .collect();
        Ok(ids.into_iter().take(limit).collect())
    }
}

#[async_trait::async_trait]
impl MatchupRatingRepository for MockStore {
    async fn get_matchup_ratings(&self, steam_id: &str) -> Result<MatchupRatings, RepoError> {
        self.check()?;
        let rows: Vec<(i32, i32, i32)> = self
            .inner
            .lock()
            .unwrap()
            .matchup_rows
            .iter()
            .filter(|(id, ..)| id == steam_id)
            .map(|&(_, mine, theirs, rating)| (mine, theirs, rating))
            .collect();
        Ok(MatchupRatings::from_rows(rows))
    }
}

#[async_trait::async_trait]
impl ActivityRepository for MockStore {
    async fn get_daily_counts(
        &self,
        steam_id: &str,
        year: i32,
    ) -> Result<HashMap<NaiveDate, u32>, RepoError> {
        self.check()?;
        let mut counts = HashMap::new();
        for d in self.player_duels(steam_id) {
            let day = utc(d.end_time).date_naive();
            if day.year() == year {
                *counts.entry(day).or_default() += 1;
            }
        }
        Ok(counts)
    }

    async fn get_active_years(&self, steam_id: &str) -> Result<Vec<i32>, RepoError> {
        self.check()?;
        let years: BTreeSet<i32> = self
            .player_duels(steam_id)
            .iter()
            .map(|d| utc(d.end_time).year())
            .collect();
        Ok(years.into_iter().rev().collect())
    }

    async fn get_hourly_counts(
        &self,
        steam_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<(u32, u32)>, RepoError> {
        self.check()?;
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for d in self.player_duels(steam_id) {
            let time = utc(d.end_time);
            if time.date_naive() == date {
                *counts.entry(time.hour()).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait::async_trait]
impl StorageHealth for MockStore {
    async fn ping(&self) -> Result<(), RepoError> {
        self.check()
    }
}

/// Profile port returning a fixed name for every id.
#[derive(Clone, Default)]
pub struct MockSteamProfiles {
    lookups: Arc<Mutex<Vec<SteamId64>>>,
}

impl MockSteamProfiles {
    pub fn lookups(&self) -> Vec<SteamId64> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SteamProfilePort for MockSteamProfiles {
    async fn get_profile(&self, steam_id: SteamId64) -> SteamProfile {
        self.lookups.lock().unwrap().push(steam_id);
        SteamProfile {
            steam_id,
            persona_name: format!("persona-{}", steam_id),
            avatar_url: "https://avatars.example/a.jpg".to_string(),
            profile_url: None,
        }
    }
}

/// Identity provider accepting any callback whose claimed id is a bare 64-bit id.
#[derive(Clone, Default)]
pub struct MockIdentityProvider;

#[async_trait::async_trait]
impl IdentityProviderPort for MockIdentityProvider {
    fn login_url(&self) -> String {
        "https://login.example/openid".to_string()
    }

    async fn verify_callback(&self, params: &[(String, String)]) -> Option<SteamId64> {
        params
            .iter()
            .find(|(k, _)| k == "openid.claimed_id")
            .and_then(|(_, v)| v.parse().ok())
    }
}
