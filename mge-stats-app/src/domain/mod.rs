pub mod activity;
pub mod duel;
pub mod matchup;
pub mod player;

pub const DUELS_PER_PAGE: usize = 10;
pub const PLAYERS_PER_PAGE: usize = 25;
pub const SEARCH_SUGGESTION_LIMIT: usize = 10;
pub const SEARCH_PAGE_LIMIT: usize = 50;
/// Highest page number a request can ask for; larger values are clamped.
pub const MAX_PAGE: usize = i32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// Only a case-insensitive `asc` selects ascending order.
    pub fn from_param(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// One-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            per_page: per_page.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page)
    }
}

#[derive(Debug, Clone)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn empty(pagination: Pagination) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            pagination,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.total_count)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            pagination: self.pagination,
        }
    }
}

#[derive(Debug)]
pub enum RepoError {
    StorageError(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum RepoRetrieveError {
    NotFound,
    StorageError(String),
}

impl std::fmt::Display for RepoRetrieveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoRetrieveError::NotFound => write!(f, "Resource not found"),
            RepoRetrieveError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

/// Connectivity probe of the backing store.
#[async_trait::async_trait]
pub trait StorageHealth {
    async fn ping(&self) -> Result<(), RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 10);
        assert_eq!((p.offset(), p.limit()), (0, 10));
        let p = Pagination::new(3, 25);
        assert_eq!(p.offset(), 50);
        let p = Pagination::new(0, 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let p = Pagination::new(usize::MAX, 25);
        assert_eq!(p.page, MAX_PAGE);
        assert_eq!(p.offset(), (MAX_PAGE - 1) * 25);
        assert!(i64::try_from(p.offset()).is_ok());
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }

    #[test]
    fn test_sort_order_param() {
        assert_eq!(SortOrder::from_param("asc"), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param("ASC"), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param("desc"), SortOrder::Descending);
        assert_eq!(SortOrder::from_param("sideways"), SortOrder::Descending);
        assert_eq!(SortOrder::Ascending.toggled().as_sql(), "DESC");
    }
}
