use mge_core::rating::win_rate;

use crate::domain::{PaginatedResponse, Pagination, RepoError, RepoRetrieveError, SortOrder};

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStats {
    pub steam_id: String,
    pub name: Option<String>,
    pub rating: i32,
    pub wins: i32,
    pub losses: i32,
}

impl PlayerStats {
    pub fn win_rate(&self) -> f64 {
        win_rate(self.wins as i64, self.losses as i64)
    }

    pub fn games(&self) -> i64 {
        self.wins as i64 + self.losses as i64
    }

    /// Stored name, or the steam id when the name is missing.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.steam_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerSortBy {
    #[default]
    Rating,
    Wins,
    Losses,
    WinRate,
    LastDuel,
}

impl PlayerSortBy {
    /// Unknown keys fall back to rating.
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "wins" => PlayerSortBy::Wins,
            "losses" => PlayerSortBy::Losses,
            "winrate" => PlayerSortBy::WinRate,
            "last_duel" => PlayerSortBy::LastDuel,
            _ => PlayerSortBy::Rating,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            PlayerSortBy::Rating => "rating",
            PlayerSortBy::Wins => "wins",
            PlayerSortBy::Losses => "losses",
            PlayerSortBy::WinRate => "winrate",
            PlayerSortBy::LastDuel => "last_duel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerSort {
    pub by: PlayerSortBy,
    pub order: SortOrder,
}

impl PlayerSort {
    pub fn from_params(sort_by: Option<&str>, sort_dir: Option<&str>) -> Self {
        Self {
            by: sort_by.map(PlayerSortBy::from_param).unwrap_or_default(),
            order: sort_dir.map(SortOrder::from_param).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerQuery {
    pub pagination: Pagination,
    pub sort: PlayerSort,
}

#[derive(Debug, Clone)]
pub struct PlayerSearchQuery {
    pub text: String,
    pub limit: usize,
    pub sort: PlayerSort,
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn get_player(&self, steam_id: &str) -> Result<PlayerStats, RepoRetrieveError>;
    async fn get_players_by_ids(&self, steam_ids: &[String]) -> Result<Vec<PlayerStats>, RepoError>;
    async fn query_players(
        &self,
        query: PlayerQuery,
    ) -> Result<PaginatedResponse<PlayerStats>, RepoError>;
    /// Relevance ordered: exact name, partial name, exact id, partial id.
    async fn search_players(&self, query: PlayerSearchQuery)
    -> Result<Vec<PlayerStats>, RepoError>;
    async fn count_players(&self) -> Result<usize, RepoError>;
    async fn highest_rating(&self) -> Result<Option<i32>, RepoError>;
}
