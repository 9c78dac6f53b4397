pub use mge_core::duel::{DuelKind, DuelRecord, DuelSide, DuelSlot};

use crate::domain::{PaginatedResponse, Pagination, RepoError, RepoRetrieveError, SortOrder};

/// Map and arena prefix of the class practice rotation.
pub const PRACTICE_MAP_NAME: &str = "Регулировка";
pub const PRACTICE_ARENA_PREFIX: &str = "Матчап";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuelSortBy {
    #[default]
    EndTime,
    Id,
    Map,
    Arena,
}

impl DuelSortBy {
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "id" => DuelSortBy::Id,
            "map" | "mapname" => DuelSortBy::Map,
            "arena" | "arenaname" => DuelSortBy::Arena,
            _ => DuelSortBy::EndTime,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            DuelSortBy::EndTime => "endtime",
            DuelSortBy::Id => "id",
            DuelSortBy::Map => "map",
            DuelSortBy::Arena => "arena",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DuelSort {
    pub by: DuelSortBy,
    pub order: SortOrder,
}

impl DuelSort {
    pub fn from_params(sort_by: Option<&str>, sort_dir: Option<&str>) -> Self {
        Self {
            by: sort_by.map(DuelSortBy::from_param).unwrap_or_default(),
            order: sort_dir.map(SortOrder::from_param).unwrap_or_default(),
        }
    }
}

/// Combined 1v1 and 2v2 listing, optionally restricted to one participant.
#[derive(Debug, Clone)]
pub struct DuelQuery {
    pub pagination: Pagination,
    pub sort: DuelSort,
    pub participant: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpponentCount {
    pub steam_id: String,
    pub duel_count: i64,
}

#[async_trait::async_trait]
pub trait DuelRepository {
    async fn query_duels(
        &self,
        query: DuelQuery,
    ) -> Result<PaginatedResponse<DuelRecord>, RepoError>;
    async fn get_duel(&self, kind: DuelKind, id: i64) -> Result<DuelRecord, RepoRetrieveError>;
    async fn count_duels(&self, kind: DuelKind) -> Result<usize, RepoError>;
    /// All duels of a player ended at or after `since`, oldest first.
    async fn get_player_duels(
        &self,
        steam_id: &str,
        since: Option<i64>,
    ) -> Result<Vec<DuelRecord>, RepoError>;
    /// Most frequent 1v1 opponent, self duels excluded.
    async fn get_most_frequent_opponent(
        &self,
        steam_id: &str,
    ) -> Result<Option<OpponentCount>, RepoError>;
    async fn get_practice_duels(
        &self,
        steam_id: &str,
        limit: usize,
    ) -> Result<Vec<DuelRecord>, RepoError>;
    /// Distinct participant ids partially matching `text`.
    async fn search_participants(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<String>, RepoError>;
}
