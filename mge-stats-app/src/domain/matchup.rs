pub use mge_core::matchup::{MatchupCounter, MatchupRatings, MatchupStats};

use crate::domain::RepoError;

#[async_trait::async_trait]
pub trait MatchupRatingRepository {
    async fn get_matchup_ratings(&self, steam_id: &str) -> Result<MatchupRatings, RepoError>;
}
