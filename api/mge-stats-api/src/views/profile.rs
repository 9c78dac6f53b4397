use maud::{Markup, html};
use mge_core::{TfClass, class::display_class_list, rating::rating_color};
use mge_stats_app::{
    domain::PaginatedResponse,
    workflow::{
        activity::heatmap::ActivityHeatmap,
        profile::{
            duels::PlayerDuel,
            overview::{PlayerProfile, PracticeDuel, RatingPoint},
        },
    },
};

use crate::views::{
    Header, PageKind, avatar, duel_href, empty_row, format_elo_change, format_time,
    format_win_rate, heatmap::heatmap, href, losers, page, pagination, player_link, rating_badge,
    winners,
};

pub struct ProfileView<'a> {
    pub profile: &'a PlayerProfile,
    pub duels: &'a PaginatedResponse<PlayerDuel>,
    pub heatmap: Option<&'a ActivityHeatmap>,
}

fn summary(profile: &PlayerProfile) -> Markup {
    let steam = profile.steam_profile.as_ref();
    html! {
        section.card.profile-header {
            (avatar(steam.map(|p| p.avatar_url.as_str())))
            div.profile-identity {
                h1 { (profile.nickname) }
                div.muted { (profile.steam_id) }
                @if let Some(url) = steam.and_then(|p| p.profile_url.as_deref()) {
                    a.steam-link href=(url) target="_blank" rel="noopener" { "Steam profile" }
                }
            }
            div.profile-stats {
                div.stat-card {
                    div.stat-value {
                        @match &profile.stats {
                            Some(stats) => { (rating_badge(stats.rating)) }
                            None => { "N/A" }
                        }
                    }
                    div.stat-label { "Rating" }
                }
                @if let Some(stats) = &profile.stats {
                    div.stat-card { div.stat-value.wins { (stats.wins) } div.stat-label { "Wins" } }
                    div.stat-card { div.stat-value.losses { (stats.losses) } div.stat-label { "Losses" } }
                    div.stat-card {
                        div.stat-value { (format_win_rate(stats.win_rate())) }
                        div.stat-label { "Win rate" }
                    }
                }
            }
        }
    }
}

fn nemesis(profile: &PlayerProfile) -> Markup {
    html! {
        section.card.nemesis {
            h2 { "Nemesis" }
            @match &profile.nemesis {
                Some(nemesis) => {
                    p {
                        (player_link(&nemesis.steam_id, &nemesis.nickname))
                        span.muted { " · " (nemesis.duel_count) " duels" }
                    }
                }
                None => { p.muted { "No 1v1 opponents yet" } }
            }
        }
    }
}

fn rating_history(points: &[RatingPoint]) -> Markup {
    let labels: Vec<String> = points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();
    let ratings: Vec<i32> = points.iter().map(|p| p.rating).collect();
    html! {
        section.card {
            h2 { "Rating over the last 30 days" }
            @if points.is_empty() {
                p.muted { "No rated duels in the last 30 days" }
            } @else {
                div.chart-box {
                    canvas #rating-chart
                        data-labels=(serde_json::to_string(&labels).unwrap_or_default())
                        data-ratings=(serde_json::to_string(&ratings).unwrap_or_default()) {}
                }
            }
        }
    }
}

fn player_duel_rows(duels: &[PlayerDuel]) -> Markup {
    html! {
        @for duel in duels {
            @let record = &duel.named.duel;
            tr.won[duel.is_winner].lost[!duel.is_winner] {
                td { a href=(duel_href(record.kind, record.id)) { "#" (record.id) } }
                td { span.duel-type { (record.kind.as_str()) } }
                td.result { @if duel.is_winner { "Win" } @else { "Loss" } }
                td.winner { (winners(&duel.named)) }
                td.score { (record.winner_score) " : " (record.loser_score) }
                td.loser { (losers(&duel.named)) }
                td.elo-change { (format_elo_change(duel.elo_change)) }
                td { (record.map_name) " / " (record.arena_name) }
                td.time { (format_time(record.end_time)) }
            }
        }
    }
}

fn duel_history(steam_id: &str, duels: &PaginatedResponse<PlayerDuel>) -> Markup {
    let link = |p: usize| href(&[("profile", steam_id), ("duels_page", &p.to_string())]);
    html! {
        section #profile-duels.card data-steam-id=(steam_id) {
            h2 { "Duels" span.muted { " (" (duels.total_count) ")" } }
            table.data-table {
                thead {
                    tr {
                        th { "Duel" } th { "Type" } th { "Result" } th { "Winner" } th { "Score" }
                        th { "Loser" } th { "Change" } th { "Map / Arena" } th { "Ended" }
                    }
                }
                tbody #profile-duels-tbody {
                    @if duels.items.is_empty() {
                        (empty_row(9, "No duels recorded"))
                    } @else {
                        (player_duel_rows(&duels.items))
                    }
                }
            }
            div #profile-duels-pagination.pagination {
                (pagination(duels.pagination.page, duels.total_pages(), link))
            }
        }
    }
}

fn activity(steam_id: &str, activity: Option<&ActivityHeatmap>) -> Markup {
    html! {
        section.card {
            h2 { "Activity" }
            div #heatmap-container data-steam-id=(steam_id) {
                @if let Some(activity) = activity {
                    (heatmap(activity))
                } @else {
                    p.muted { "No activity data" }
                }
            }
            div #daily-chart-container.chart-box hidden {
                div.daily-chart-header {
                    h3 #daily-chart-title { "Duels by hour" }
                    button #daily-chart-close type="button" { "×" }
                }
                canvas #daily-chart {}
            }
        }
    }
}

fn matchup_grid(profile: &PlayerProfile) -> Markup {
    let most_played = profile
        .matchup_stats
        .most_played()
        .map(|(mine, theirs, _)| (mine, theirs));
    html! {
        section.card {
            h2 { "Class matchups" }
            p.muted { "Rows are your class, columns the opponent's class." }
            div.matchup-scroll {
                table.matchup-grid {
                    thead {
                        tr {
                            th {}
                            @for theirs in TfClass::all() {
                                th { (class_icon(theirs)) }
                            }
                        }
                    }
                    tbody {
                        @for mine in TfClass::all() {
                            tr {
                                th { (class_icon(mine)) }
                                @for theirs in TfClass::all() {
                                    @let rating = profile.matchup_ratings.get(mine, theirs);
                                    @let counter = profile.matchup_stats.get(mine, theirs);
                                    td.matchup-cell.most-played[most_played == Some((mine, theirs))]
                                        data-mine=(mine.display_name()) data-theirs=(theirs.display_name())
                                        data-rating=(rating) data-total=(counter.total) data-wins=(counter.wins) {
                                        span.rating style=(format!("color: {}", rating_color(rating))) { (rating) }
                                        @if counter.total > 0 {
                                            span.matchup-record { (counter.wins) "/" (counter.total) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div #matchup-tooltip.matchup-tooltip hidden {}
        }
    }
}

fn class_icon(class: TfClass) -> Markup {
    html! {
        img.class-icon src=(format!("/class-icons/{}", class.icon_file()))
            alt=(class.display_name()) title=(class.display_name());
    }
}

fn practice_row(steam_id: &str, practice: &PracticeDuel) -> Markup {
    let duel = &practice.duel;
    let my_class = duel
        .slot_of(steam_id)
        .map(|(_, slot)| display_class_list(&slot.class))
        .unwrap_or_default();
    let opponent_class = duel
        .participants()
        .find(|slot| slot.steam_id == practice.opponent_id)
        .map(|slot| display_class_list(&slot.class))
        .unwrap_or_default();
    html! {
        tr.won[practice.won].lost[!practice.won] {
            td { a href=(duel_href(duel.kind, duel.id)) { "#" (duel.id) } }
            td { (player_link(&practice.opponent_id, &practice.opponent_nick)) }
            td { (my_class) " vs " (opponent_class) }
            td.result { @if practice.won { "Win" } @else { "Loss" } }
            td.score { (duel.winner_score) " : " (duel.loser_score) }
            td.elo-change { (format_elo_change(duel.elo_change_for(steam_id))) }
            td { (duel.arena_name) }
            td.time { (format_time(duel.end_time)) }
        }
    }
}

fn practice(profile: &PlayerProfile) -> Markup {
    html! {
        section.card {
            h2 { "Practice matchups" }
            table.data-table {
                thead {
                    tr {
                        th { "Duel" } th { "Opponent" } th { "Classes" } th { "Result" }
                        th { "Score" } th { "Change" } th { "Arena" } th { "Ended" }
                    }
                }
                tbody {
                    @if profile.practice_duels.is_empty() {
                        (empty_row(8, "No practice duels"))
                    }
                    @for duel in &profile.practice_duels {
                        (practice_row(&profile.steam_id, duel))
                    }
                }
            }
        }
    }
}

pub fn render(header: &Header<'_>, view: &ProfileView<'_>) -> Markup {
    let profile = view.profile;
    let content = html! {
        (summary(profile))
        div.profile-columns {
            (nemesis(profile))
            (rating_history(&profile.rating_history))
        }
        (duel_history(&profile.steam_id, view.duels))
        (activity(&profile.steam_id, view.heatmap))
        (matchup_grid(profile))
        (practice(profile))
    };
    page(header, PageKind::Profile, &profile.nickname, content)
}
