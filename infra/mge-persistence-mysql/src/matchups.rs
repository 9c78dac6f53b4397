use mge_stats_app::domain::{
    RepoError,
    matchup::{MatchupRatingRepository, MatchupRatings},
};
use sqlx::{MySql, Pool};

use crate::{storage_error, to_i32};

pub struct MatchupRatingRepositoryImpl {
    pool: Pool<MySql>,
}

impl MatchupRatingRepositoryImpl {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MatchupRatingRepository for MatchupRatingRepositoryImpl {
    async fn get_matchup_ratings(&self, steam_id: &str) -> Result<MatchupRatings, RepoError> {
        let rows: Vec<(i64, i64, Option<i64>)> = sqlx::query_as(
            "SELECT CAST(my_class AS SIGNED), CAST(opponent_class AS SIGNED), CAST(rating AS SIGNED) \
             FROM mgemod_matchup_ratings WHERE steamid = ?",
        )
        .bind(steam_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(MatchupRatings::from_rows(rows.into_iter().filter_map(
            |(mine, theirs, rating)| Some((to_i32(mine), to_i32(theirs), to_i32(rating?))),
        )))
    }
}
