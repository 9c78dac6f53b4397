use maud::{Markup, html};
use mge_stats_app::domain::player::PlayerStats;

use crate::views::{Header, PageKind, empty_row, page, player_rows};

pub fn render(header: &Header<'_>, text: &str, players: &[PlayerStats]) -> Markup {
    let content = html! {
        section.card {
            h2 { "Search results for “" (text) "”" }
            p.muted { (players.len()) " players found" }
            table.data-table {
                thead {
                    tr {
                        th { "#" }
                        th { "Player" }
                        th { "Rating" }
                        th { "Wins" }
                        th { "Losses" }
                        th { "Win rate" }
                    }
                }
                tbody {
                    @if players.is_empty() {
                        (empty_row(6, "No players found"))
                    } @else {
                        (player_rows(players, 1))
                    }
                }
            }
        }
    };
    page(header, PageKind::Dashboard, "Search", content)
}
