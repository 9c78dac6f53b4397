use maud::{Markup, html};
use mge_stats_app::{
    domain::{
        PaginatedResponse, SortOrder,
        duel::DuelSort,
        player::{PlayerSort, PlayerSortBy, PlayerStats},
    },
    workflow::{duels::NamedDuel, leaderboard::totals::OverviewTotals},
};

use crate::views::{
    Header, PageKind, duel_rows, empty_row, href, page, pagination, player_rows,
};

pub struct HomeView {
    pub totals: OverviewTotals,
    pub players: PaginatedResponse<PlayerStats>,
    pub player_sort: PlayerSort,
    pub duels: PaginatedResponse<NamedDuel>,
    pub duel_sort: DuelSort,
}

const SORTABLE_COLUMNS: [(PlayerSortBy, &str); 4] = [
    (PlayerSortBy::Rating, "Rating"),
    (PlayerSortBy::Wins, "Wins"),
    (PlayerSortBy::Losses, "Losses"),
    (PlayerSortBy::WinRate, "Win rate"),
];

fn sort_header(current: PlayerSort, by: PlayerSortBy, label: &str) -> Markup {
    let order = if current.by == by {
        current.order.toggled()
    } else {
        SortOrder::Descending
    };
    let link = href(&[("sort_by", by.as_param()), ("sort_dir", order.as_sql())]);
    html! {
        th {
            a.sort-link.active[current.by == by] href=(link) data-sort=(by.as_param()) {
                (label)
                @if current.by == by {
                    @match current.order {
                        SortOrder::Ascending => { " ▲" }
                        SortOrder::Descending => { " ▼" }
                    }
                }
            }
        }
    }
}

fn stat_card(label: &str, value: Markup) -> Markup {
    html! {
        div.stat-card {
            div.stat-value { (value) }
            div.stat-label { (label) }
        }
    }
}

pub fn render(header: &Header<'_>, view: &HomeView) -> Markup {
    let sort = view.player_sort;
    let player_page = view.players.pagination;
    let players_link = |p: usize| {
        href(&[
            ("page", &p.to_string()),
            ("sort_by", sort.by.as_param()),
            ("sort_dir", sort.order.as_sql()),
        ])
    };
    let duel_sort = view.duel_sort;
    let duels_link = |p: usize| {
        href(&[
            ("page", &p.to_string()),
            ("duel_sort_by", duel_sort.by.as_param()),
            ("duel_sort_dir", duel_sort.order.as_sql()),
        ])
    };
    let totals = &view.totals;

    let content = html! {
        section.stats-grid {
            (stat_card("1v1 duels", html! { (totals.total_duels) }))
            (stat_card("2v2 duels", html! { (totals.total_duels_2v2) }))
            (stat_card("Players", html! { (totals.total_players) }))
            (stat_card("Highest rating", html! {
                @match totals.highest_rating {
                    Some(rating) => { (rating) }
                    None => { "N/A" }
                }
            }))
        }
        section #leaderboard.card data-sort-by=(sort.by.as_param()) data-sort-dir=(sort.order.as_sql()) {
            h2 { "Leaderboard" }
            table.data-table {
                thead {
                    tr {
                        th { "#" }
                        th { "Player" }
                        @for (by, label) in SORTABLE_COLUMNS {
                            (sort_header(sort, by, label))
                        }
                    }
                }
                tbody #players-tbody {
                    @if view.players.items.is_empty() {
                        (empty_row(6, "No players found"))
                    } @else {
                        (player_rows(&view.players.items, player_page.offset() + 1))
                    }
                }
            }
            div #players-pagination.pagination {
                (pagination(player_page.page, view.players.total_pages(), players_link))
            }
        }
        section #recent-duels.card data-sort-by=(duel_sort.by.as_param()) data-sort-dir=(duel_sort.order.as_sql()) {
            h2 { "Recent duels" }
            table.data-table {
                thead {
                    tr {
                        th { "Duel" }
                        th { "Type" }
                        th { "Winner" }
                        th { "Score" }
                        th { "Loser" }
                        th { "Classes" }
                        th { "Map / Arena" }
                        th { "Ended" }
                    }
                }
                tbody #duels-tbody {
                    @if view.duels.items.is_empty() {
                        (empty_row(8, "No duels recorded yet"))
                    } @else {
                        (duel_rows(&view.duels.items))
                    }
                }
            }
            div #duels-pagination.pagination {
                (pagination(view.duels.pagination.page, view.duels.total_pages(), duels_link))
            }
        }
    };
    page(header, PageKind::Dashboard, "Overview", content)
}
