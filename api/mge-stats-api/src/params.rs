use mge_stats_app::domain::{MAX_PAGE, duel::DuelSort, player::PlayerSort};

/// Loosely typed query string; malformed values fall back to defaults instead of rejecting.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = match raw {
            Some(raw) => serde_urlencoded::from_str::<Vec<(String, String)>>(raw).unwrap_or_else(
                |e| {
                    log::debug!("Ignoring malformed query `{}`: {}", raw, e);
                    Vec::new()
                },
            ),
            None => Vec::new(),
        };
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Last value of `key`, like repeated keys in a classic query string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Trimmed value, `None` when missing or blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).map(coerce_int)
    }

    /// One-based page number, anything invalid is page 1 and huge values are clamped.
    pub fn page(&self, key: &str) -> usize {
        self.int(key)
            .and_then(|page| usize::try_from(page).ok())
            .unwrap_or(1)
            .clamp(1, MAX_PAGE)
    }

    pub fn player_sort(&self) -> PlayerSort {
        PlayerSort::from_params(self.get("sort_by"), self.get("sort_dir"))
    }

    pub fn duel_sort(&self) -> DuelSort {
        DuelSort::from_params(self.get("duel_sort_by"), self.get("duel_sort_dir"))
    }
}

/// Leading integer of `s`, `0` when there is none. Saturates instead of overflowing.
pub fn coerce_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = (digit - b'0') as i64;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

#[cfg(test)]
mod tests {
    use mge_stats_app::domain::{SortOrder, duel::DuelSortBy, player::PlayerSortBy};

    use super::*;

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int("42"), 42);
        assert_eq!(coerce_int("  7abc"), 7);
        assert_eq!(coerce_int("-3"), -3);
        assert_eq!(coerce_int("abc"), 0);
        assert_eq!(coerce_int(""), 0);
        assert_eq!(coerce_int("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_page_is_at_least_one() {
        let params = QueryParams::parse(Some("page=0&duels_page=-4&other=x3"));
        assert_eq!(params.page("page"), 1);
        assert_eq!(params.page("duels_page"), 1);
        assert_eq!(params.page("other"), 1);
        assert_eq!(params.page("missing"), 1);
        assert_eq!(QueryParams::parse(Some("page=12")).page("page"), 12);
        assert_eq!(
            QueryParams::parse(Some("page=99999999999999999999")).page("page"),
            MAX_PAGE
        );
    }

    #[test]
    fn test_decoding_and_repeated_keys() {
        let params = QueryParams::parse(Some(
            "profile=STEAM_0%3A1%3A42&search=+&openid.mode=id_res&q=a&q=b",
        ));
        assert_eq!(params.get("profile"), Some("STEAM_0:1:42"));
        assert_eq!(params.text("search"), None);
        assert!(params.has("search"));
        assert_eq!(params.get("openid.mode"), Some("id_res"));
        assert_eq!(params.get("q"), Some("b"));
    }

    #[test]
    fn test_sorts() {
        let params = QueryParams::parse(Some(
            "sort_by=wins&sort_dir=ASC&duel_sort_by=evil&duel_sort_dir=up",
        ));
        assert_eq!(params.player_sort().by, PlayerSortBy::Wins);
        assert_eq!(params.player_sort().order, SortOrder::Ascending);
        assert_eq!(params.duel_sort().by, DuelSortBy::EndTime);
        assert_eq!(params.duel_sort().order, SortOrder::Descending);
    }
}
