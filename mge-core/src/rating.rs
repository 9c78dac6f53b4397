pub const DEFAULT_RATING: i32 = 1500;

/// Win percentage rounded to two decimals, `0.0` without games.
pub fn win_rate(wins: i64, losses: i64) -> f64 {
    let total = wins + losses;
    if total <= 0 {
        return 0.0;
    }
    let rate = wins as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

pub fn rating_color(rating: i32) -> &'static str {
    if rating > 2000 {
        "#4caf50"
    } else if rating > 1700 {
        "#8bc34a"
    } else if rating == DEFAULT_RATING {
        "#cddc39"
    } else if rating > 1300 {
        "#9ccc65"
    } else if rating > 1000 {
        "#ff9800"
    } else {
        "#f44336"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate() {
        assert_eq!(win_rate(7, 3), 70.0);
        assert_eq!(format!("{:.2}", win_rate(7, 3)), "70.00");
        assert_eq!(win_rate(2, 1), 66.67);
        assert_eq!(win_rate(1, 2), 33.33);
        assert_eq!(win_rate(5, 0), 100.0);
    }

    #[test]
    fn test_win_rate_without_games() {
        assert_eq!(win_rate(0, 0), 0.0);
    }

    #[test]
    fn test_rating_color() {
        assert_eq!(rating_color(2100), "#4caf50");
        assert_eq!(rating_color(2000), "#8bc34a");
        assert_eq!(rating_color(1500), "#cddc39");
        assert_eq!(rating_color(1501), "#9ccc65");
        assert_eq!(rating_color(1300), "#ff9800");
        assert_eq!(rating_color(1000), "#f44336");
    }
}
