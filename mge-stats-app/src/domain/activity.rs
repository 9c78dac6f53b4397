use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::RepoError;

#[async_trait::async_trait]
pub trait ActivityRepository {
    /// Duels per calendar day across both duel tables.
    async fn get_daily_counts(
        &self,
        steam_id: &str,
        year: i32,
    ) -> Result<HashMap<NaiveDate, u32>, RepoError>;
    /// Years with at least one duel, newest first.
    async fn get_active_years(&self, steam_id: &str) -> Result<Vec<i32>, RepoError>;
    /// `(hour, count)` pairs for one day, hours without duels omitted.
    async fn get_hourly_counts(
        &self,
        steam_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<(u32, u32)>, RepoError>;
}
