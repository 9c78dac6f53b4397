use mge_core::rating::DEFAULT_RATING;
use mge_stats_app::domain::{
    PaginatedResponse, RepoError, RepoRetrieveError,
    player::{PlayerQuery, PlayerRepository, PlayerSearchQuery, PlayerSort, PlayerSortBy, PlayerStats},
};
use sqlx::{MySql, Pool, Row, mysql::MySqlRow};

use crate::{contains_pattern, storage_error, to_i32};

const PLAYER_COLUMNS: &str = "ms.steamid, ms.name, \
    CAST(ms.rating AS SIGNED) AS rating, \
    CAST(ms.wins AS SIGNED) AS wins, \
    CAST(ms.losses AS SIGNED) AS losses";

fn sort_expression(by: PlayerSortBy) -> &'static str {
    match by {
        PlayerSortBy::Rating => "ms.rating",
        PlayerSortBy::Wins => "ms.wins",
        PlayerSortBy::Losses => "ms.losses",
        PlayerSortBy::WinRate => {
            "CASE WHEN (ms.wins + ms.losses) > 0 THEN ms.wins / (ms.wins + ms.losses) ELSE 0 END"
        }
        PlayerSortBy::LastDuel => {
            "GREATEST(\
             COALESCE((SELECT MAX(d.endtime) FROM mgemod_duels d \
             WHERE d.winner = ms.steamid OR d.loser = ms.steamid), 0), \
             COALESCE((SELECT MAX(t.endtime) FROM mgemod_duels_2v2 t \
             WHERE t.winner = ms.steamid OR t.winner2 = ms.steamid \
             OR t.loser = ms.steamid OR t.loser2 = ms.steamid), 0))"
        }
    }
}

pub(crate) fn order_by(sort: PlayerSort) -> String {
    format!(
        "{} {}, ms.steamid ASC",
        sort_expression(sort.by),
        sort.order.as_sql()
    )
}

pub struct PlayerRepositoryImpl {
    pool: Pool<MySql>,
}

impl PlayerRepositoryImpl {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn player_from_row(row: &MySqlRow) -> sqlx::Result<PlayerStats> {
        let rating: Option<i64> = row.try_get("rating")?;
        let wins: Option<i64> = row.try_get("wins")?;
        let losses: Option<i64> = row.try_get("losses")?;
        Ok(PlayerStats {
            steam_id: row.try_get("steamid")?,
            name: row.try_get("name")?,
            rating: rating.map(to_i32).unwrap_or(DEFAULT_RATING),
            wins: wins.map(to_i32).unwrap_or(0),
            losses: losses.map(to_i32).unwrap_or(0),
        })
    }

    fn players_from_rows(rows: &[MySqlRow]) -> Result<Vec<PlayerStats>, RepoError> {
        rows.iter()
            .map(Self::player_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(storage_error)
    }
}

#[async_trait::async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn get_player(&self, steam_id: &str) -> Result<PlayerStats, RepoRetrieveError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM mgemod_stats ms WHERE ms.steamid = ? LIMIT 1",
            PLAYER_COLUMNS
        ))
        .bind(steam_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
        .ok_or(RepoRetrieveError::NotFound)?;
        Self::player_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }

    async fn get_players_by_ids(&self, steam_ids: &[String]) -> Result<Vec<PlayerStats>, RepoError> {
        if steam_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; steam_ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM mgemod_stats ms WHERE ms.steamid IN ({})",
            PLAYER_COLUMNS, placeholders
        );
        let mut query = sqlx::query(&sql);
        for steam_id in steam_ids {
            query = query.bind(steam_id);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(storage_error)?;
        Self::players_from_rows(&rows)
    }

    async fn query_players(
        &self,
        query: PlayerQuery,
    ) -> Result<PaginatedResponse<PlayerStats>, RepoError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT CAST(COUNT(*) AS SIGNED) FROM mgemod_stats ms WHERE ms.rating IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        let sql = format!(
            "SELECT {} FROM mgemod_stats ms WHERE ms.rating IS NOT NULL ORDER BY {} LIMIT ? OFFSET ?",
            PLAYER_COLUMNS,
            order_by(query.sort)
        );
        let rows = sqlx::query(&sql)
            .bind(query.pagination.limit() as i64)
            .bind(i64::try_from(query.pagination.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(PaginatedResponse {
            items: Self::players_from_rows(&rows)?,
            total_count: total.max(0) as usize,
            pagination: query.pagination,
        })
    }

    async fn search_players(
        &self,
        query: PlayerSearchQuery,
    ) -> Result<Vec<PlayerStats>, RepoError> {
        let pattern = contains_pattern(&query.text);
        let sql = format!(
            "SELECT {}, \
             CASE \
                WHEN ms.name = ? THEN 1 \
                WHEN ms.name LIKE ? THEN 2 \
                WHEN ms.steamid = ? THEN 3 \
                WHEN ms.steamid LIKE ? THEN 4 \
                ELSE 5 \
             END AS relevance_order \
             FROM mgemod_stats ms \
             WHERE (ms.name IS NOT NULL AND ms.name LIKE ?) OR ms.steamid LIKE ? \
             ORDER BY relevance_order ASC, {} \
             LIMIT ?",
            PLAYER_COLUMNS,
            order_by(query.sort)
        );
        let rows = sqlx::query(&sql)
            .bind(&query.text)
            .bind(&pattern)
            .bind(&query.text)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(query.limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Self::players_from_rows(&rows)
    }

    async fn count_players(&self) -> Result<usize, RepoError> {
        let total: i64 = sqlx::query_scalar("SELECT CAST(COUNT(*) AS SIGNED) FROM mgemod_stats")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(total.max(0) as usize)
    }

    async fn highest_rating(&self) -> Result<Option<i32>, RepoError> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT CAST(MAX(rating) AS SIGNED) FROM mgemod_stats")
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error)?;
        Ok(max.map(to_i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mge_stats_app::domain::SortOrder;

    #[test]
    fn test_every_sort_key_maps_to_fixed_expression() {
        let sort = |by, order| PlayerSort { by, order };
        assert_eq!(
            order_by(sort(PlayerSortBy::Rating, SortOrder::Descending)),
            "ms.rating DESC, ms.steamid ASC"
        );
        assert_eq!(
            order_by(sort(PlayerSortBy::Wins, SortOrder::Ascending)),
            "ms.wins ASC, ms.steamid ASC"
        );
        assert_eq!(
            order_by(sort(PlayerSortBy::Losses, SortOrder::Descending)),
            "ms.losses DESC, ms.steamid ASC"
        );
        assert!(
            order_by(sort(PlayerSortBy::WinRate, SortOrder::Ascending))
                .starts_with("CASE WHEN (ms.wins + ms.losses) > 0")
        );
        assert!(
            order_by(sort(PlayerSortBy::LastDuel, SortOrder::Descending))
                .contains("mgemod_duels_2v2")
        );
    }

    #[test]
    fn test_unknown_sort_key_uses_rating() {
        let sort = PlayerSort::from_params(Some("rating; DROP TABLE mgemod_stats"), Some("up"));
        assert_eq!(order_by(sort), "ms.rating DESC, ms.steamid ASC");
    }
}
