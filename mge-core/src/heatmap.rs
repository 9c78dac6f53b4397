use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};

pub const CELL_SIZE: u32 = 15;
pub const CELL_WIDTH: u32 = 14;

pub fn heat_color(count: u32) -> &'static str {
    match count {
        0 => "#161b22",
        1..=2 => "#0e4429",
        3..=4 => "#006d32",
        5..=7 => "#26a641",
        _ => "#39d353",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub week: u32,
    pub weekday: u32,
    pub count: u32,
}

impl HeatmapCell {
    pub fn x(&self) -> u32 {
        self.week * CELL_SIZE
    }

    pub fn y(&self) -> u32 {
        self.weekday * CELL_SIZE
    }

    pub fn color(&self) -> &'static str {
        heat_color(self.count)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthLabel {
    pub month: u32,
    pub x: u32,
}

impl MonthLabel {
    pub fn name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES[(self.month as usize).saturating_sub(1) % 12]
    }
}

/// Week-column calendar of one year, weeks starting on Sunday.
#[derive(Clone, Debug)]
pub struct HeatmapLayout {
    pub year: i32,
    pub cells: Vec<HeatmapCell>,
    pub month_labels: Vec<MonthLabel>,
    pub weeks: u32,
}

impl HeatmapLayout {
    pub fn build(year: i32, counts: &HashMap<NaiveDate, u32>) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;

        let lead = first.weekday().num_days_from_sunday() as u64;
        let start = first.checked_sub_days(Days::new(lead))?;
        let trail = (Weekday::Sat.num_days_from_sunday()
            - last.weekday().num_days_from_sunday()) as u64;
        let end = last.checked_add_days(Days::new(trail))?;

        let mut cells = Vec::new();
        let mut month_labels: Vec<MonthLabel> = Vec::new();
        let mut week = 0;
        let mut day = start;
        while day <= end {
            if day.year() == year {
                let cell = HeatmapCell {
                    date: day,
                    week,
                    weekday: day.weekday().num_days_from_sunday(),
                    count: counts.get(&day).copied().unwrap_or(0),
                };
                if month_labels.last().is_none_or(|m| m.month != day.month()) {
                    month_labels.push(MonthLabel {
                        month: day.month(),
                        x: cell.x(),
                    });
                }
                cells.push(cell);
            }
            day = day.succ_opt()?;
            if day.weekday() == Weekday::Sun {
                week += 1;
            }
        }

        Some(Self {
            year,
            cells,
            month_labels,
            weeks: week,
        })
    }

    pub fn width(&self) -> u32 {
        (self.weeks + 1) * CELL_SIZE + 40
    }

    pub fn height(&self) -> u32 {
        7 * CELL_SIZE + 25
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().map(|c| c.count as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_heat_color_buckets() {
        assert_eq!(heat_color(0), "#161b22");
        assert_eq!(heat_color(1), "#0e4429");
        assert_eq!(heat_color(2), "#0e4429");
        assert_eq!(heat_color(3), "#006d32");
        assert_eq!(heat_color(4), "#006d32");
        assert_eq!(heat_color(5), "#26a641");
        assert_eq!(heat_color(7), "#26a641");
        assert_eq!(heat_color(8), "#39d353");
        assert_eq!(heat_color(500), "#39d353");
    }

    #[test]
    fn test_layout_2024() {
        // 2024-01-01 is a Monday, 2024-12-31 a Tuesday.
        let layout = HeatmapLayout::build(2024, &HashMap::new()).unwrap();
        assert_eq!(layout.cells.len(), 366);
        assert_eq!(layout.weeks, 53);
        assert_eq!(layout.width(), 54 * 15 + 40);
        assert_eq!(layout.height(), 130);

        let first = &layout.cells[0];
        assert_eq!(first.date, date(2024, 1, 1));
        assert_eq!((first.x(), first.y()), (0, 15));

        let last = layout.cells.last().unwrap();
        assert_eq!(last.date, date(2024, 12, 31));
        assert_eq!(last.week, 52);
        assert_eq!(last.weekday, 2);
    }

    #[test]
    fn test_layout_starting_on_sunday() {
        // 2023-01-01 is a Sunday.
        let layout = HeatmapLayout::build(2023, &HashMap::new()).unwrap();
        assert_eq!(layout.cells[0].week, 0);
        assert_eq!(layout.cells[0].weekday, 0);
        assert_eq!(layout.cells.len(), 365);
    }

    #[test]
    fn test_month_labels() {
        let layout = HeatmapLayout::build(2024, &HashMap::new()).unwrap();
        assert_eq!(layout.month_labels.len(), 12);
        assert_eq!(layout.month_labels[0].x, 0);
        assert_eq!(layout.month_labels[0].name(), "Jan");
        // 2024-02-01 is a Thursday in the fifth column.
        assert_eq!(layout.month_labels[1].x, 4 * CELL_SIZE);
        assert_eq!(layout.month_labels[11].name(), "Dec");
    }

    #[test]
    fn test_counts_are_placed() {
        let mut counts = HashMap::new();
        counts.insert(date(2024, 3, 5), 6);
        counts.insert(date(2023, 12, 31), 9);
        let layout = HeatmapLayout::build(2024, &counts).unwrap();
        let cell = layout
            .cells
            .iter()
            .find(|c| c.date == date(2024, 3, 5))
            .unwrap();
        assert_eq!(cell.count, 6);
        assert_eq!(cell.color(), "#26a641");
        assert_eq!(layout.total(), 6);
    }
}
