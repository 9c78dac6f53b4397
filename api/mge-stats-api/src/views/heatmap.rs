use maud::{Markup, html};
use mge_core::heatmap::{CELL_WIDTH, heat_color};
use mge_stats_app::workflow::activity::heatmap::ActivityHeatmap;

const LEGEND_COUNTS: [u32; 5] = [0, 1, 3, 5, 8];

/// Calendar grid of one year with the year switcher; also returned as the AJAX fragment.
pub fn heatmap(heatmap: &ActivityHeatmap) -> Markup {
    let layout = &heatmap.layout;
    html! {
        div.heatmap {
            div.heatmap-graph {
                svg.calendar width=(layout.width()) height=(layout.height()) {
                    g transform="translate(36, 12)" font-size="11" fill="#7d8590" {
                        @for label in &layout.month_labels {
                            text x=(label.x) y="0" { (label.name()) }
                        }
                    }
                    g transform="translate(0, 28)" font-size="10" fill="#7d8590" {
                        text x="0" y="26" { "Mon" }
                        text x="0" y="56" { "Wed" }
                        text x="0" y="86" { "Fri" }
                    }
                    g transform="translate(36, 20)" {
                        @for cell in &layout.cells {
                            @let date = cell.date.format("%Y-%m-%d").to_string();
                            rect.day width=(CELL_WIDTH) height=(CELL_WIDTH) x=(cell.x()) y=(cell.y())
                                fill=(cell.color()) data-count=(cell.count) data-date=(date) rx="2" ry="2" {
                                title { (date) ": " (cell.count) " duels" }
                            }
                        }
                    }
                }
            }
            @if !heatmap.years.is_empty() {
                div.year-selector {
                    @for year in &heatmap.years {
                        button.year-btn.active[*year == heatmap.year] type="button" data-year=(year) {
                            (year)
                        }
                    }
                }
            }
        }
        div.heatmap-legend {
            span { "Less" }
            @for count in LEGEND_COUNTS {
                span.legend-cell style=(format!("background: {}", heat_color(count))) {}
            }
            span { "More" }
            span.heatmap-total { (layout.total()) " duels in " (heatmap.year) }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use mge_core::heatmap::HeatmapLayout;

    use super::*;

    #[test]
    fn test_heatmap_fragment() {
        let mut counts = HashMap::new();
        counts.insert(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 4);
        let activity = ActivityHeatmap {
            year: 2024,
            years: vec![2024, 2023],
            layout: HeatmapLayout::build(2024, &counts).unwrap(),
        };
        let html = heatmap(&activity).into_string();
        assert_eq!(html.matches("<rect").count(), 366);
        assert!(html.contains(r##"fill="#006d32" data-count="4" data-date="2024-03-05""##));
        assert!(html.contains("<title>2024-03-05: 4 duels</title>"));
        assert!(html.contains("year-btn active"));
        assert_eq!(html.matches("year-btn active").count(), 1);
        assert!(html.contains(r#"data-year="2023""#));
        assert!(html.contains(">Jan</text>"));
    }
}
