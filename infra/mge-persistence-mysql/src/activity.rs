use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use mge_stats_app::domain::{RepoError, activity::ActivityRepository};
use sqlx::{MySql, Pool};

use crate::{ONE_VS_ONE_PARTICIPANT, TWO_VS_TWO_PARTICIPANT, storage_error, to_i32};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// End times of every duel of one participant ended in `[?, ?)`.
fn participant_end_times() -> String {
    format!(
        "(SELECT endtime FROM mgemod_duels WHERE {} AND endtime >= ? AND endtime < ? \
         UNION ALL \
         SELECT endtime FROM mgemod_duels_2v2 WHERE {} AND endtime >= ? AND endtime < ?) AS all_duels",
        ONE_VS_ONE_PARTICIPANT, TWO_VS_TWO_PARTICIPANT
    )
}

/// Unix second range `[start, end)` of a UTC calendar year.
fn year_bounds(year: i32) -> Option<(i64, i64)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
    Some((day_start(start)?, day_start(end)?))
}

fn day_start(date: NaiveDate) -> Option<i64> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

fn date_from_day_number(day: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(day.checked_mul(SECONDS_PER_DAY)?, 0).map(|t| t.date_naive())
}

pub struct ActivityRepositoryImpl {
    pool: Pool<MySql>,
}

impl ActivityRepositoryImpl {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// `(bucket, count)` rows of one participant's duels in `[start, end)`.
    async fn bucket_counts(
        &self,
        bucket: &str,
        steam_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<(i64, i64)>, RepoError> {
        let sql = format!(
            "SELECT CAST({bucket} AS SIGNED) AS bucket, CAST(COUNT(*) AS SIGNED) AS duel_count \
             FROM {source} GROUP BY bucket ORDER BY bucket",
            bucket = bucket,
            source = participant_end_times()
        );
        sqlx::query_as(&sql)
            .bind(steam_id)
            .bind(steam_id)
            .bind(start)
            .bind(end)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }
}

#[async_trait::async_trait]
impl ActivityRepository for ActivityRepositoryImpl {
    async fn get_daily_counts(
        &self,
        steam_id: &str,
        year: i32,
    ) -> Result<HashMap<NaiveDate, u32>, RepoError> {
        let Some((start, end)) = year_bounds(year) else {
            return Ok(HashMap::new());
        };
        let rows = self
            .bucket_counts("FLOOR(endtime / 86400)", steam_id, start, end)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(day, count)| {
                Some((date_from_day_number(day)?, to_i32(count).max(0) as u32))
            })
            .collect())
    }

    async fn get_active_years(&self, steam_id: &str) -> Result<Vec<i32>, RepoError> {
        let sql = format!(
            "SELECT DISTINCT CAST(YEAR(FROM_UNIXTIME(endtime)) AS SIGNED) AS year \
             FROM (SELECT endtime FROM mgemod_duels WHERE {} \
                   UNION ALL \
                   SELECT endtime FROM mgemod_duels_2v2 WHERE {}) AS all_duels \
             ORDER BY year DESC",
            ONE_VS_ONE_PARTICIPANT, TWO_VS_TWO_PARTICIPANT
        );
        let years: Vec<Option<i64>> = sqlx::query_scalar(&sql)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .bind(steam_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(years.into_iter().flatten().map(to_i32).collect())
    }

    async fn get_hourly_counts(
        &self,
        steam_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<(u32, u32)>, RepoError> {
        let Some(start) = day_start(date) else {
            return Ok(Vec::new());
        };
        let rows = self
            .bucket_counts(
                "FLOOR(MOD(endtime, 86400) / 3600)",
                steam_id,
                start,
                start + SECONDS_PER_DAY,
            )
            .await?;
        Ok(rows
            .into_iter()
            .filter(|&(hour, _)| (0..24).contains(&hour))
            .map(|(hour, count)| (hour as u32, to_i32(count).max(0) as u32))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds() {
        assert_eq!(year_bounds(2024), Some((1_704_067_200, 1_735_689_600)));
        assert_eq!(year_bounds(i32::MAX), None);
    }

    #[test]
    fn test_day_number_to_date() {
        assert_eq!(
            date_from_day_number(1_700_000_000 / SECONDS_PER_DAY),
            NaiveDate::from_ymd_opt(2023, 11, 14)
        );
        assert_eq!(date_from_day_number(0), NaiveDate::from_ymd_opt(1970, 1, 1));
    }

    #[test]
    fn test_participant_source_placeholders() {
        assert_eq!(participant_end_times().matches('?').count(), 10);
    }
}
