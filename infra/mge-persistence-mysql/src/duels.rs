use mge_stats_app::domain::{
    PaginatedResponse, RepoError, RepoRetrieveError,
    duel::{
        DuelKind, DuelQuery, DuelRecord, DuelRepository, DuelSlot, DuelSort, DuelSortBy,
        OpponentCount, PRACTICE_ARENA_PREFIX, PRACTICE_MAP_NAME,
    },
};
use sqlx::{MySql, Pool, Row, mysql::MySqlRow};

use crate::{
    ONE_VS_ONE_PARTICIPANT, TWO_VS_TWO_PARTICIPANT, contains_pattern, storage_error, to_i32,
};

const ONE_VS_ONE_COLUMNS: &str = "'1v1' AS type, CAST(id AS SIGNED) AS id, \
    CAST(endtime AS SIGNED) AS endtime, \
    winner, loser, CAST(NULL AS CHAR) AS winner2, CAST(NULL AS CHAR) AS loser2, \
    winnerclass, loserclass, CAST(NULL AS CHAR) AS winner2class, CAST(NULL AS CHAR) AS loser2class, \
    CAST(winnerscore AS SIGNED) AS winnerscore, CAST(loserscore AS SIGNED) AS loserscore, \
    mapname, arenaname, \
    CAST(winner_new_elo AS SIGNED) AS winner_new_elo, \
    CAST(winner_previous_elo AS SIGNED) AS winner_previous_elo, \
    CAST(loser_new_elo AS SIGNED) AS loser_new_elo, \
    CAST(loser_previous_elo AS SIGNED) AS loser_previous_elo, \
    CAST(NULL AS SIGNED) AS winner2_new_elo, CAST(NULL AS SIGNED) AS winner2_previous_elo, \
    CAST(NULL AS SIGNED) AS loser2_new_elo, CAST(NULL AS SIGNED) AS loser2_previous_elo";

const TWO_VS_TWO_COLUMNS: &str = "'2v2' AS type, CAST(id AS SIGNED) AS id, \
    CAST(endtime AS SIGNED) AS endtime, \
    winner, loser, winner2, loser2, \
    winnerclass, loserclass, winner2class, loser2class, \
    CAST(winnerscore AS SIGNED) AS winnerscore, CAST(loserscore AS SIGNED) AS loserscore, \
    mapname, arenaname, \
    CAST(winner_new_elo AS SIGNED) AS winner_new_elo, \
    CAST(winner_previous_elo AS SIGNED) AS winner_previous_elo, \
    CAST(loser_new_elo AS SIGNED) AS loser_new_elo, \
    CAST(loser_previous_elo AS SIGNED) AS loser_previous_elo, \
    CAST(winner2_new_elo AS SIGNED) AS winner2_new_elo, \
    CAST(winner2_previous_elo AS SIGNED) AS winner2_previous_elo, \
    CAST(loser2_new_elo AS SIGNED) AS loser2_new_elo, \
    CAST(loser2_previous_elo AS SIGNED) AS loser2_previous_elo";

fn table(kind: DuelKind) -> &'static str {
    match kind {
        DuelKind::OneVsOne => "mgemod_duels",
        DuelKind::TwoVsTwo => "mgemod_duels_2v2",
    }
}

fn columns(kind: DuelKind) -> &'static str {
    match kind {
        DuelKind::OneVsOne => ONE_VS_ONE_COLUMNS,
        DuelKind::TwoVsTwo => TWO_VS_TWO_COLUMNS,
    }
}

fn sort_column(by: DuelSortBy) -> &'static str {
    match by {
        DuelSortBy::EndTime => "endtime",
        DuelSortBy::Id => "id",
        DuelSortBy::Map => "mapname",
        DuelSortBy::Arena => "arenaname",
    }
}

pub(crate) fn order_by(sort: DuelSort) -> String {
    let dir = sort.order.as_sql();
    match sort.by {
        DuelSortBy::Id => format!("id {}, type ASC", dir),
        by => format!("{} {}, id {}", sort_column(by), dir, dir),
    }
}

/// Both duel tables as one derived table, optionally filtered to one participant.
fn combined_source(participant: bool) -> String {
    let (one, two) = if participant {
        (
            format!(" WHERE {}", ONE_VS_ONE_PARTICIPANT),
            format!(" WHERE {}", TWO_VS_TWO_PARTICIPANT),
        )
    } else {
        (String::new(), String::new())
    };
    format!(
        "(SELECT {} FROM mgemod_duels{} UNION ALL SELECT {} FROM mgemod_duels_2v2{}) AS combined",
        ONE_VS_ONE_COLUMNS, one, TWO_VS_TWO_COLUMNS, two
    )
}

pub struct DuelRepositoryImpl {
    pool: Pool<MySql>,
}

impl DuelRepositoryImpl {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn slot_from_row(row: &MySqlRow, prefix: &str) -> sqlx::Result<Option<DuelSlot>> {
        let steam_id: Option<String> = row.try_get(prefix)?;
        let Some(steam_id) = steam_id else {
            return Ok(None);
        };
        let class: Option<String> = row.try_get(format!("{}class", prefix).as_str())?;
        let new_elo: Option<i64> = row.try_get(format!("{}_new_elo", prefix).as_str())?;
        let previous_elo: Option<i64> =
            row.try_get(format!("{}_previous_elo", prefix).as_str())?;
        Ok(Some(DuelSlot {
            steam_id,
            class: class.unwrap_or_default(),
            previous_elo: previous_elo.map(to_i32),
            new_elo: new_elo.map(to_i32),
        }))
    }

    fn duel_from_row(row: &MySqlRow) -> sqlx::Result<DuelRecord> {
        let kind: String = row.try_get("type")?;
        let winner_score: Option<i64> = row.try_get("winnerscore")?;
        let loser_score: Option<i64> = row.try_get("loserscore")?;
        let map_name: Option<String> = row.try_get("mapname")?;
        let arena_name: Option<String> = row.try_get("arenaname")?;
        Ok(DuelRecord {
            kind: DuelKind::from_param(&kind),
            id: row.try_get("id")?,
            end_time: row.try_get::<Option<i64>, _>("endtime")?.unwrap_or(0),
            winner: Self::slot_from_row(row, "winner")?.unwrap_or_default(),
            loser: Self::slot_from_row(row, "loser")?.unwrap_or_default(),
            winner2: Self::slot_from_row(row, "winner2")?,
            loser2: Self::slot_from_row(row, "loser2")?,
            winner_score: winner_score.map(to_i32).unwrap_or(0),
            loser_score: loser_score.map(to_i32).unwrap_or(0),
            map_name: map_name.unwrap_or_default(),
            arena_name: arena_name.unwrap_or_default(),
        })
    }

    fn duels_from_rows(rows: &[MySqlRow]) -> Result<Vec<DuelRecord>, RepoError> {
        rows.iter()
            .map(Self::duel_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(storage_error)
    }

    async fn count_participant_duels(&self, steam_id: &str) -> Result<usize, RepoError> {
        let sql = format!(
            "SELECT CAST((SELECT COUNT(*) FROM mgemod_duels WHERE {}) \
             + (SELECT COUNT(*) FROM mgemod_duels_2v2 WHERE {}) AS SIGNED)",
            ONE_VS_ONE_PARTICIPANT, TWO_VS_TWO_PARTICIPANT
        );
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(total.max(0) as usize)
    }

    async fn count_all_duels(&self) -> Result<usize, RepoError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT CAST((SELECT COUNT(*) FROM mgemod_duels) \
             + (SELECT COUNT(*) FROM mgemod_duels_2v2) AS SIGNED)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(total.max(0) as usize)
    }
}

#[async_trait::async_trait]
impl DuelRepository for DuelRepositoryImpl {
    async fn query_duels(
        &self,
        query: DuelQuery,
    ) -> Result<PaginatedResponse<DuelRecord>, RepoError> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY {} LIMIT ? OFFSET ?",
            combined_source(query.participant.is_some()),
            order_by(query.sort)
        );
        let mut select = sqlx::query(&sql);
        let total = match &query.participant {
            Some(steam_id) => {
                for _ in 0..6 {
                    select = select.bind(steam_id.as_str());
                }
                self.count_participant_duels(steam_id).await?
            }
            None => self.count_all_duels().await?,
        };
        let rows = select
            .bind(query.pagination.limit() as i64)
            .bind(i64::try_from(query.pagination.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(PaginatedResponse {
            items: Self::duels_from_rows(&rows)?,
            total_count: total,
            pagination: query.pagination,
        })
    }

    async fn get_duel(&self, kind: DuelKind, id: i64) -> Result<DuelRecord, RepoRetrieveError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ? LIMIT 1",
            columns(kind),
            table(kind)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::duel_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }

    async fn count_duels(&self, kind: DuelKind) -> Result<usize, RepoError> {
        let sql = format!("SELECT CAST(COUNT(*) AS SIGNED) FROM {}", table(kind));
        let total: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(total.max(0) as usize)
    }

    async fn get_player_duels(
        &self,
        steam_id: &str,
        since: Option<i64>,
    ) -> Result<Vec<DuelRecord>, RepoError> {
        let sql = format!(
            "SELECT * FROM {} WHERE endtime >= ? ORDER BY endtime ASC, id ASC",
            combined_source(true)
        );
        let mut select = sqlx::query(&sql);
        for _ in 0..6 {
            select = select.bind(steam_id);
        }
        let rows = select
            .bind(since.unwrap_or(0))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Self::duels_from_rows(&rows)
    }

    async fn get_most_frequent_opponent(
        &self,
        steam_id: &str,
    ) -> Result<Option<OpponentCount>, RepoError> {
        let row = sqlx::query(
            "SELECT \
                CASE WHEN winner = ? THEN loser ELSE winner END AS opponent, \
                CAST(COUNT(*) AS SIGNED) AS duels_count \
             FROM mgemod_duels \
             WHERE (winner = ? OR loser = ?) AND winner != loser \
             GROUP BY opponent \
             ORDER BY duels_count DESC, opponent ASC \
             LIMIT 1",
        )
        .bind(steam_id)
        .bind(steam_id)
        .bind(steam_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let opponent: Option<String> = row.try_get("opponent").map_err(storage_error)?;
        let duel_count: i64 = row.try_get("duels_count").map_err(storage_error)?;
        Ok(opponent.map(|steam_id| OpponentCount {
            steam_id,
            duel_count,
        }))
    }

    async fn get_practice_duels(
        &self,
        steam_id: &str,
        limit: usize,
    ) -> Result<Vec<DuelRecord>, RepoError> {
        let sql = format!(
            "SELECT {} FROM mgemod_duels \
             WHERE {} AND mapname = ? AND arenaname LIKE ? \
             ORDER BY endtime DESC LIMIT ?",
            ONE_VS_ONE_COLUMNS, ONE_VS_ONE_PARTICIPANT
        );
        let rows = sqlx::query(&sql)
            .bind(steam_id)
            .bind(steam_id)
            .bind(PRACTICE_MAP_NAME)
            .bind(format!("{}%", PRACTICE_ARENA_PREFIX))
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Self::duels_from_rows(&rows)
    }

    async fn search_participants(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<String>, RepoError> {
        let ids: Vec<Option<String>> = sqlx::query_scalar(
            "SELECT steamid FROM ( \
                SELECT winner AS steamid FROM mgemod_duels \
                UNION SELECT loser FROM mgemod_duels \
                UNION SELECT winner FROM mgemod_duels_2v2 \
                UNION SELECT winner2 FROM mgemod_duels_2v2 \
                UNION SELECT loser FROM mgemod_duels_2v2 \
                UNION SELECT loser2 FROM mgemod_duels_2v2 \
             ) AS participants \
             WHERE steamid LIKE ? \
             ORDER BY steamid \
             LIMIT ?",
        )
        .bind(contains_pattern(text))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(ids
            .into_iter()
            .flatten()
            .filter(|id| !id.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mge_stats_app::domain::SortOrder;

    #[test]
    fn test_every_sort_key_maps_to_fixed_expression() {
        let sort = |by, order| DuelSort { by, order };
        assert_eq!(
            order_by(sort(DuelSortBy::EndTime, SortOrder::Descending)),
            "endtime DESC, id DESC"
        );
        assert_eq!(
            order_by(sort(DuelSortBy::Map, SortOrder::Ascending)),
            "mapname ASC, id ASC"
        );
        assert_eq!(
            order_by(sort(DuelSortBy::Arena, SortOrder::Descending)),
            "arenaname DESC, id DESC"
        );
        assert_eq!(
            order_by(sort(DuelSortBy::Id, SortOrder::Ascending)),
            "id ASC, type ASC"
        );
    }

    #[test]
    fn test_unknown_sort_key_uses_endtime() {
        let sort = DuelSort::from_params(Some("winner"), Some("ASC"));
        assert_eq!(order_by(sort), "endtime ASC, id ASC");
    }

    #[test]
    fn test_combined_source_placeholders() {
        assert_eq!(combined_source(false).matches('?').count(), 0);
        assert_eq!(combined_source(true).matches('?').count(), 6);
        assert!(combined_source(true).contains("winner2 = ?"));
    }
}
