use std::{collections::HashMap, sync::Arc};

use chrono::{Datelike, Utc};
use mge_core::heatmap::HeatmapLayout;

use crate::domain::{RepoError, activity::ActivityRepository};

#[derive(Clone, Debug)]
pub struct ActivityHeatmap {
    pub year: i32,
    /// Years with activity, newest first.
    pub years: Vec<i32>,
    pub layout: HeatmapLayout,
}

/// Requested year when the player was active in it, else the newest active year.
pub fn select_year(requested: Option<i32>, years: &[i32], current_year: i32) -> i32 {
    match requested {
        Some(year) if years.contains(&year) => year,
        _ => years.first().copied().unwrap_or(current_year),
    }
}

/// Years a heatmap can be laid out for.
const RENDERABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

#[async_trait::async_trait]
pub trait GetActivityHeatmapUseCase {
    /// Heatmap of `year` when the player was active in it, else of the newest active year.
    async fn get_heatmap(&self, steam_id: &str, year: Option<i32>) -> Option<ActivityHeatmap>;
    /// Heatmap of exactly `year`, even when it holds no duels.
    async fn get_heatmap_of_year(&self, steam_id: &str, year: i32) -> Option<ActivityHeatmap>;
}

pub struct GetActivityHeatmapUseCaseImpl<AR: ActivityRepository> {
    activity_repository: Arc<AR>,
}

impl<AR: ActivityRepository> GetActivityHeatmapUseCaseImpl<AR> {
    pub fn new(activity_repository: Arc<AR>) -> Self {
        Self {
            activity_repository,
        }
    }

    async fn active_years(&self, steam_id: &str) -> Vec<i32> {
        match self.activity_repository.get_active_years(steam_id).await {
            Ok(years) => years,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting active years of {}: {}", steam_id, e);
                Vec::new()
            }
        }
    }

    async fn build(&self, steam_id: &str, year: i32, years: Vec<i32>) -> Option<ActivityHeatmap> {
        let counts = match self
            .activity_repository
            .get_daily_counts(steam_id, year)
            .await
        {
            Ok(counts) => counts,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting activity of {} in {}: {}", steam_id, year, e);
                HashMap::new()
            }
        };
        let layout = HeatmapLayout::build(year, &counts)?;
        Some(ActivityHeatmap {
            year,
            years,
            layout,
        })
    }
}

#[async_trait::async_trait]
impl<AR: ActivityRepository + Send + Sync + 'static> GetActivityHeatmapUseCase
    for GetActivityHeatmapUseCaseImpl<AR>
{
    async fn get_heatmap(&self, steam_id: &str, year: Option<i32>) -> Option<ActivityHeatmap> {
        let years = self.active_years(steam_id).await;
        let year = select_year(year, &years, Utc::now().year());
        self.build(steam_id, year, years).await
    }

    async fn get_heatmap_of_year(&self, steam_id: &str, year: i32) -> Option<ActivityHeatmap> {
        if !RENDERABLE_YEARS.contains(&year) {
            return self.get_heatmap(steam_id, None).await;
        }
        let years = self.active_years(steam_id).await;
        self.build(steam_id, year, years).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockStore, duel, slot};

    #[test]
    fn test_select_year() {
        assert_eq!(select_year(Some(2023), &[2024, 2023], 2025), 2023);
        assert_eq!(select_year(Some(2019), &[2024, 2023], 2025), 2024);
        assert_eq!(select_year(None, &[2024, 2023], 2025), 2024);
        assert_eq!(select_year(Some(2019), &[], 2025), 2025);
    }

    #[tokio::test]
    async fn test_heatmap_counts_days() {
        let store = MockStore::default();
        // 2023-11-14 22:13:20 UTC and one hour later on 2023-11-14 23:13:20
        store.add_duel(duel(1, 1_700_000_000, slot("me", "scout", 1500, 1510), slot("x", "scout", 1500, 1490)));
        store.add_duel(duel(2, 1_700_003_600, slot("x", "scout", 1490, 1500), slot("me", "scout", 1510, 1500)));
        // 2022-01-01 00:00:00 UTC
        store.add_duel(duel(3, 1_640_995_200, slot("me", "scout", 1500, 1510), slot("x", "scout", 1500, 1490)));
        let use_case = GetActivityHeatmapUseCaseImpl::new(Arc::new(store));

        let heatmap = use_case.get_heatmap("me", Some(2023)).await.unwrap();
        assert_eq!(heatmap.year, 2023);
        assert_eq!(heatmap.years, vec![2023, 2022]);
        assert_eq!(heatmap.layout.total(), 2);
        let day = heatmap
            .layout
            .cells
            .iter()
            .find(|c| c.count > 0)
            .unwrap();
        assert_eq!(day.date.to_string(), "2023-11-14");
        assert_eq!(day.count, 2);

        let heatmap = use_case.get_heatmap("me", Some(1999)).await.unwrap();
        assert_eq!(heatmap.year, 2023);

        let heatmap = use_case.get_heatmap("me", Some(2022)).await.unwrap();
        assert_eq!(heatmap.layout.total(), 1);
    }

    #[tokio::test]
    async fn test_heatmap_of_inactive_year() {
        let store = MockStore::default();
        store.add_duel(duel(1, 1_700_000_000, slot("me", "scout", 1500, 1510), slot("x", "scout", 1500, 1490)));
        let use_case = GetActivityHeatmapUseCaseImpl::new(Arc::new(store));

        let heatmap = use_case.get_heatmap_of_year("me", 2019).await.unwrap();
        assert_eq!(heatmap.year, 2019);
        assert_eq!(heatmap.years, vec![2023]);
        assert_eq!(heatmap.layout.total(), 0);

        let heatmap = use_case.get_heatmap_of_year("me", 2023).await.unwrap();
        assert_eq!(heatmap.layout.total(), 1);

        let heatmap = use_case.get_heatmap_of_year("me", 0).await.unwrap();
        assert_eq!(heatmap.year, 2023);
    }

    #[tokio::test]
    async fn test_storage_error_renders_empty_current_year() {
        let store = MockStore::default();
        store.set_failing(true);
        let use_case = GetActivityHeatmapUseCaseImpl::new(Arc::new(store));
        let heatmap = use_case.get_heatmap("me", None).await.unwrap();
        assert_eq!(heatmap.year, Utc::now().year());
        assert!(heatmap.years.is_empty());
        assert_eq!(heatmap.layout.total(), 0);
    }
}
