use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{RepoError, activity::ActivityRepository};

pub const HOURS_PER_DAY: usize = 24;

#[async_trait::async_trait]
pub trait GetDailyActivityUseCase {
    /// Duel count per UTC hour of one day; an unparsable date yields all zeros.
    async fn get_hourly(&self, steam_id: &str, date: Option<NaiveDate>) -> [u32; HOURS_PER_DAY];
}

pub struct GetDailyActivityUseCaseImpl<AR: ActivityRepository> {
    activity_repository: Arc<AR>,
}

impl<AR: ActivityRepository> GetDailyActivityUseCaseImpl<AR> {
    pub fn new(activity_repository: Arc<AR>) -> Self {
        Self {
            activity_repository,
        }
    }
}

#[async_trait::async_trait]
impl<AR: ActivityRepository + Send + Sync + 'static> GetDailyActivityUseCase
    for GetDailyActivityUseCaseImpl<AR>
{
    async fn get_hourly(&self, steam_id: &str, date: Option<NaiveDate>) -> [u32; HOURS_PER_DAY] {
        let mut hours = [0; HOURS_PER_DAY];
        let Some(date) = date else {
            return hours;
        };
        match self
            .activity_repository
            .get_hourly_counts(steam_id, date)
            .await
        {
            Ok(counts) => {
                for (hour, count) in counts {
                    if let Some(slot) = hours.get_mut(hour as usize) {
                        *slot = count;
                    }
                }
            }
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting hourly activity of {} on {}: {}", steam_id, date, e);
            }
        }
        hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockStore, duel, slot};

    #[tokio::test]
    async fn test_hourly_counts() {
        let store = MockStore::default();
        // 22:13 and 23:13 UTC on 2023-11-14, plus a second duel in the 22:00 hour
        store.add_duel(duel(1, 1_700_000_000, slot("me", "scout", 1500, 1510), slot("x", "scout", 1500, 1490)));
        store.add_duel(duel(2, 1_700_000_600, slot("me", "scout", 1510, 1520), slot("x", "scout", 1490, 1480)));
        store.add_duel(duel(3, 1_700_003_600, slot("x", "scout", 1480, 1490), slot("me", "scout", 1520, 1510)));
        let use_case = GetDailyActivityUseCaseImpl::new(Arc::new(store));

        let hours = use_case
            .get_hourly("me", NaiveDate::from_ymd_opt(2023, 11, 14))
            .await;
        assert_eq!(hours[22], 2);
        assert_eq!(hours[23], 1);
        assert_eq!(hours.iter().sum::<u32>(), 3);

        let other_day = use_case
            .get_hourly("me", NaiveDate::from_ymd_opt(2023, 11, 15))
            .await;
        assert_eq!(other_day, [0; HOURS_PER_DAY]);
    }

    #[tokio::test]
    async fn test_missing_date_is_all_zero() {
        let use_case = GetDailyActivityUseCaseImpl::new(Arc::new(MockStore::default()));
        assert_eq!(use_case.get_hourly("me", None).await, [0; HOURS_PER_DAY]);
    }
}
