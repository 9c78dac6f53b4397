use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use maud::Markup;
use mge_core::DuelKind;

use crate::{
    AppState, ajax,
    params::QueryParams,
    session::{clear_session, generate_jwt, session_cookie, session_steam_id},
    views::{
        self, Header,
        home::HomeView,
        href, message_page,
        profile::ProfileView,
    },
};

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let params = QueryParams::parse(query.as_deref());

    if let Some(action) = params.get("ajax") {
        return ajax::dispatch(&state, action, &params).await;
    }
    if params.has("logout") {
        return (clear_session(jar), Redirect::to(&return_href(&params))).into_response();
    }
    let login = &state.app.account_login_use_case;
    if login.is_callback(params.pairs()) {
        let jar = match login.complete_login(params.pairs()).await {
            Some(steam_id) => match generate_jwt(steam_id) {
                Some(token) => jar.add(session_cookie(token)),
                None => jar,
            },
            None => jar,
        };
        return (jar, Redirect::to("/")).into_response();
    }

    let viewer = match session_steam_id(&jar) {
        Some(steam_id) => state.app.account_viewer_use_case.get_viewer(steam_id).await,
        None => None,
    };
    let login_url = login.login_url();
    let logout_href = logout_href(&params);
    let header = Header {
        viewer: viewer.as_ref(),
        login_url: &login_url,
        logout_href: &logout_href,
        search: params.text("search").unwrap_or_default(),
    };
    render(&state, &header, &params).await
}

async fn render(state: &AppState, header: &Header<'_>, params: &QueryParams) -> Response {
    if let Some(steam_id) = params.text("profile") {
        return html(profile_page(state, header, params, steam_id).await);
    }
    if let Some(id) = params.int("duel") {
        let kind = DuelKind::from_param(params.get("type").unwrap_or_default());
        return match state.app.duel_get_use_case.get_duel(kind, id).await {
            Some(named) => html(views::duel::render(header, &named)),
            None => (
                StatusCode::NOT_FOUND,
                html(message_page(
                    header,
                    "Duel not found",
                    &format!("No {} duel with id {} exists.", kind, id),
                )),
            )
                .into_response(),
        };
    }
    if let Some(text) = params.text("search") {
        let players = state
            .app
            .player_search_use_case
            .search(text, params.player_sort())
            .await;
        return html(views::search::render(header, text, &players));
    }
    html(home_page(state, header, params).await)
}

async fn home_page(state: &AppState, header: &Header<'_>, params: &QueryParams) -> Markup {
    let page = params.page("page");
    let player_sort = params.player_sort();
    let duel_sort = params.duel_sort();
    let (totals, players, duels) = tokio::join!(
        state.app.overview_totals_use_case.get_totals(),
        state.app.player_list_use_case.list_players(page, player_sort),
        state.app.duel_list_use_case.list_duels(page, duel_sort),
    );
    views::home::render(
        header,
        &HomeView {
            totals,
            players,
            player_sort,
            duels,
            duel_sort,
        },
    )
}

async fn profile_page(
    state: &AppState,
    header: &Header<'_>,
    params: &QueryParams,
    steam_id: &str,
) -> Markup {
    let year = params
        .int("year")
        .and_then(|year| i32::try_from(year).ok());
    let (profile, duels, heatmap) = tokio::join!(
        state.app.profile_get_use_case.get_profile(steam_id),
        state
            .app
            .profile_duels_use_case
            .list_player_duels(steam_id, params.page("duels_page")),
        state.app.activity_heatmap_use_case.get_heatmap(steam_id, year),
    );
    views::profile::render(
        header,
        &ProfileView {
            profile: &profile,
            duels: &duels,
            heatmap: heatmap.as_ref(),
        },
    )
}

fn html(markup: Markup) -> Response {
    Html(markup.into_string()).into_response()
}

/// Page a logout returns to: the profile or duel being viewed, else the overview.
fn return_href(params: &QueryParams) -> String {
    if let Some(profile) = params.text("profile") {
        return href(&[("profile", profile)]);
    }
    if let Some(duel) = params.text("duel") {
        let kind = params.text("type").unwrap_or(DuelKind::OneVsOne.as_str());
        return href(&[("duel", duel), ("type", kind)]);
    }
    "/".to_string()
}

fn logout_href(params: &QueryParams) -> String {
    let mut pairs = vec![("logout", "1")];
    if let Some(profile) = params.text("profile") {
        pairs.push(("profile", profile));
    } else if let Some(duel) = params.text("duel") {
        pairs.push(("duel", duel));
        pairs.push(("type", params.text("type").unwrap_or(DuelKind::OneVsOne.as_str())));
    }
    href(&pairs)
}
