use chrono::DateTime;
use maud::{DOCTYPE, Markup, html};
use mge_core::{DuelKind, DuelSlot, class::display_class_list, rating::rating_color};
use mge_stats_app::{
    domain::player::PlayerStats,
    ports::steam_profile::DEFAULT_AVATAR_URL,
    workflow::{account::viewer::ViewerSummary, duels::NamedDuel},
};

pub mod duel;
pub mod heatmap;
pub mod home;
pub mod profile;
pub mod search;

const STEAM_SIGN_IN_IMAGE: &str =
    "https://community.cloudflare.steamstatic.com/public/images/signinthroughsteam/sits_01.png";
const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js";

/// Per-request header state.
pub struct Header<'a> {
    pub viewer: Option<&'a ViewerSummary>,
    pub login_url: &'a str,
    pub logout_href: &'a str,
    pub search: &'a str,
}

pub enum PageKind {
    Dashboard,
    Profile,
}

pub fn page(header: &Header<'_>, kind: PageKind, title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | MGE Stats" }
                link rel="stylesheet" href="/assets/style.css";
                @if let PageKind::Profile = kind {
                    script defer src=(CHART_JS) {}
                    script defer src="/assets/profile.js" {}
                }
                script defer src="/assets/dashboard.js" {}
            }
            body {
                nav.topbar {
                    a.brand href="/" { "MGE Stats" }
                    form.search-form method="get" action="/" {
                        input #player-search type="search" name="search" value=(header.search)
                            placeholder="Search by name or Steam ID" autocomplete="off";
                        div #search-suggestions.suggestions {}
                    }
                    div.account {
                        @if let Some(viewer) = header.viewer {
                            a.viewer href=(profile_href(&viewer.legacy_id.to_string())) {
                                img.avatar src=(viewer.profile.avatar_url) alt="";
                                span.viewer-name { (viewer.profile.persona_name) }
                                @if let Some(stats) = &viewer.stats {
                                    (rating_badge(stats.rating))
                                }
                            }
                            a.logout href=(header.logout_href) { "Log out" }
                        } @else {
                            a.login href=(header.login_url) {
                                img src=(STEAM_SIGN_IN_IMAGE) alt="Sign in through Steam";
                            }
                        }
                    }
                }
                main { (content) }
                div #loading-overlay.loading-overlay hidden { div.spinner {} }
            }
        }
    }
}

pub fn message_page(header: &Header<'_>, title: &str, message: &str) -> Markup {
    page(
        header,
        PageKind::Dashboard,
        title,
        html! {
            section.card.empty-state {
                h2 { (title) }
                p { (message) }
                a href="/" { "Back to the overview" }
            }
        },
    )
}

pub fn href(pairs: &[(&str, &str)]) -> String {
    match serde_urlencoded::to_string(pairs) {
        Ok(query) if !query.is_empty() => format!("/?{}", query),
        _ => "/".to_string(),
    }
}

pub fn profile_href(steam_id: &str) -> String {
    href(&[("profile", steam_id)])
}

pub fn duel_href(kind: DuelKind, id: i64) -> String {
    href(&[("duel", &id.to_string()), ("type", kind.as_str())])
}

pub fn format_time(end_time: i64) -> String {
    DateTime::from_timestamp(end_time, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_win_rate(win_rate: f64) -> String {
    format!("{:.2}%", win_rate)
}

pub fn format_elo_change(change: Option<i32>) -> String {
    match change {
        Some(change) if change > 0 => format!("+{}", change),
        Some(change) => change.to_string(),
        None => "-".to_string(),
    }
}

pub fn rating_badge(rating: i32) -> Markup {
    html! {
        span.rating style=(format!("color: {}", rating_color(rating))) { (rating) }
    }
}

pub fn avatar(url: Option<&str>) -> Markup {
    html! {
        img.avatar-large src=(url.unwrap_or(DEFAULT_AVATAR_URL)) alt="";
    }
}

pub fn player_link(steam_id: &str, nickname: &str) -> Markup {
    html! {
        a.player-link href=(profile_href(steam_id)) { (nickname) }
    }
}

pub fn player_rows(players: &[PlayerStats], first_rank: usize) -> Markup {
    html! {
        @for (i, player) in players.iter().enumerate() {
            tr {
                td.rank { (first_rank + i) }
                td { (player_link(&player.steam_id, player.display_name())) }
                td { (rating_badge(player.rating)) }
                td.wins { (player.wins) }
                td.losses { (player.losses) }
                td { (format_win_rate(player.win_rate())) }
            }
        }
    }
}

fn side(first: (&DuelSlot, &str), second: Option<(&DuelSlot, &str)>) -> Markup {
    html! {
        (player_link(&first.0.steam_id, first.1))
        @if let Some((slot, nick)) = second {
            " & " (player_link(&slot.steam_id, nick))
        }
    }
}

pub fn winners(named: &NamedDuel) -> Markup {
    let duel = &named.duel;
    side(
        (&duel.winner, named.winner_nick.as_str()),
        duel.winner2.as_ref().zip(named.winner2_nick.as_deref()),
    )
}

pub fn losers(named: &NamedDuel) -> Markup {
    let duel = &named.duel;
    side(
        (&duel.loser, named.loser_nick.as_str()),
        duel.loser2.as_ref().zip(named.loser2_nick.as_deref()),
    )
}

pub fn duel_rows(duels: &[NamedDuel]) -> Markup {
    html! {
        @for named in duels {
            @let duel = &named.duel;
            tr {
                td { a href=(duel_href(duel.kind, duel.id)) { "#" (duel.id) } }
                td { span.duel-type { (duel.kind.as_str()) } }
                td.winner { (winners(named)) }
                td.score { (duel.winner_score) " : " (duel.loser_score) }
                td.loser { (losers(named)) }
                td { (display_class_list(&duel.winner.class)) " vs " (display_class_list(&duel.loser.class)) }
                td { (duel.map_name) " / " (duel.arena_name) }
                td.time { (format_time(duel.end_time)) }
            }
        }
    }
}

pub fn empty_row(columns: u32, message: &str) -> Markup {
    html! {
        tr { td.empty colspan=(columns) { (message) } }
    }
}

/// Page links around `current`, each carrying `data-page` for the client script.
pub fn pagination(current: usize, total_pages: usize, link: impl Fn(usize) -> String) -> Markup {
    let first = current.saturating_sub(2).max(1);
    let last = (current + 2).min(total_pages);
    html! {
        @if total_pages > 1 {
            @if current > 1 {
                a.page-link href=(link(current - 1)) data-page=(current - 1) { "«" }
            }
            @if first > 1 {
                a.page-link href=(link(1)) data-page="1" { "1" }
                @if first > 2 { span.page-gap { "…" } }
            }
            @for page in first..=last {
                a.page-link.active[page == current] href=(link(page)) data-page=(page) { (page) }
            }
            @if last < total_pages {
                @if last + 1 < total_pages { span.page-gap { "…" } }
                a.page-link href=(link(total_pages)) data-page=(total_pages) { (total_pages) }
            }
            @if current < total_pages {
                a.page-link href=(link(current + 1)) data-page=(current + 1) { "»" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hrefs_are_encoded() {
        assert_eq!(profile_href("STEAM_0:1:42"), "/?profile=STEAM_0%3A1%3A42");
        assert_eq!(duel_href(DuelKind::TwoVsTwo, 7), "/?duel=7&type=2v2");
        assert_eq!(href(&[]), "/");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_time(1_700_000_000), "2023-11-14 22:13");
        assert_eq!(format_win_rate(70.0), "70.00%");
        assert_eq!(format_elo_change(Some(25)), "+25");
        assert_eq!(format_elo_change(Some(-12)), "-12");
        assert_eq!(format_elo_change(None), "-");
    }

    #[test]
    fn test_pagination_window() {
        let markup = pagination(5, 20, |p| format!("/?page={}", p)).into_string();
        assert!(markup.contains(r#"data-page="3""#));
        assert!(markup.contains(r#"data-page="7""#));
        assert!(!markup.contains(r#"data-page="8""#));
        assert!(markup.contains(r#"data-page="20""#));
        assert!(pagination(1, 1, |p| p.to_string()).into_string().is_empty());
    }
}
