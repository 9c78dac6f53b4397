use axum::{
    Json,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use mge_core::DuelKind;
use mge_stats_app::{
    domain::{PaginatedResponse, player::PlayerStats},
    workflow::{duels::NamedDuel, profile::duels::PlayerDuel},
};
use serde::Serialize;

use crate::{AppState, ServiceError, params::QueryParams, views::heatmap::heatmap};

const DAILY_DATASET_LABEL: &str = "Duels";
const DAILY_BORDER_COLOR: &str = "rgb(74, 222, 128)";
const DAILY_BACKGROUND_COLOR: &str = "rgba(74, 222, 128, 0.1)";

#[derive(Serialize, Debug)]
pub struct JsonDuel {
    #[serde(rename = "type")]
    kind: &'static str,
    id: i64,
    endtime: i64,
    winner: String,
    loser: String,
    winnerclass: String,
    loserclass: String,
    winnerscore: i32,
    loserscore: i32,
    mapname: String,
    arenaname: String,
    winner_new_elo: Option<i32>,
    winner_previous_elo: Option<i32>,
    loser_new_elo: Option<i32>,
    loser_previous_elo: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loser2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner2class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loser2class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner2_new_elo: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner2_previous_elo: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loser2_new_elo: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loser2_previous_elo: Option<i32>,
    winner_nick: String,
    loser_nick: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner2_nick: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loser2_nick: Option<String>,
}

impl From<NamedDuel> for JsonDuel {
    fn from(named: NamedDuel) -> Self {
        let NamedDuel {
            duel,
            winner_nick,
            loser_nick,
            winner2_nick,
            loser2_nick,
        } = named;
        let winner2 = duel.winner2.as_ref();
        let loser2 = duel.loser2.as_ref();
        Self {
            kind: duel.kind.as_str(),
            id: duel.id,
            endtime: duel.end_time,
            winner: duel.winner.steam_id,
            loser: duel.loser.steam_id,
            winnerclass: duel.winner.class,
            loserclass: duel.loser.class,
            winnerscore: duel.winner_score,
            loserscore: duel.loser_score,
            mapname: duel.map_name,
            arenaname: duel.arena_name,
            winner_new_elo: duel.winner.new_elo,
            winner_previous_elo: duel.winner.previous_elo,
            loser_new_elo: duel.loser.new_elo,
            loser_previous_elo: duel.loser.previous_elo,
            winner2: winner2.map(|s| s.steam_id.clone()),
            loser2: loser2.map(|s| s.steam_id.clone()),
            winner2class: winner2.map(|s| s.class.clone()),
            loser2class: loser2.map(|s| s.class.clone()),
            winner2_new_elo: winner2.and_then(|s| s.new_elo),
            winner2_previous_elo: winner2.and_then(|s| s.previous_elo),
            loser2_new_elo: loser2.and_then(|s| s.new_elo),
            loser2_previous_elo: loser2.and_then(|s| s.previous_elo),
            winner_nick,
            loser_nick,
            winner2_nick,
            loser2_nick,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct JsonPlayerDuel {
    #[serde(flatten)]
    duel: JsonDuel,
    is_winner: bool,
    elo_change: Option<i32>,
}

#[derive(Serialize, Debug)]
pub struct JsonDuelsPage<T> {
    duels: Vec<T>,
    current_page: usize,
    total_pages: usize,
    total_duels: usize,
}

impl<T> JsonDuelsPage<T> {
    fn from_page<D>(page: PaginatedResponse<D>) -> Self
    where
        T: From<D>,
    {
        let current_page = page.pagination.page;
        let total_pages = page.total_pages();
        let total_duels = page.total_count;
        Self {
            duels: page.items.into_iter().map(T::from).collect(),
            current_page,
            total_pages,
            total_duels,
        }
    }
}

impl From<PlayerDuel> for JsonPlayerDuel {
    fn from(duel: PlayerDuel) -> Self {
        Self {
            duel: duel.named.into(),
            is_winner: duel.is_winner,
            elo_change: duel.elo_change,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct JsonPlayer {
    steamid: String,
    name: Option<String>,
    nick: String,
    rating: i32,
    wins: i32,
    losses: i32,
    winrate: f64,
}

impl From<PlayerStats> for JsonPlayer {
    fn from(player: PlayerStats) -> Self {
        Self {
            nick: player.display_name().to_string(),
            winrate: player.win_rate(),
            steamid: player.steam_id,
            name: player.name,
            rating: player.rating,
            wins: player.wins,
            losses: player.losses,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct JsonPlayersPage {
    players: Vec<JsonPlayer>,
    current_page: usize,
    total_pages: usize,
    total_players: usize,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JsonChartDataset {
    label: &'static str,
    data: Vec<u32>,
    border_color: &'static str,
    background_color: &'static str,
    tension: f64,
    fill: bool,
}

#[derive(Serialize, Debug)]
pub struct JsonDailyChart {
    labels: Vec<String>,
    datasets: Vec<JsonChartDataset>,
}

impl JsonDailyChart {
    fn from_hours(hours: &[u32]) -> Self {
        Self {
            labels: (0..hours.len()).map(|h| format!("{:02}:00", h)).collect(),
            datasets: vec![JsonChartDataset {
                label: DAILY_DATASET_LABEL,
                data: hours.to_vec(),
                border_color: DAILY_BORDER_COLOR,
                background_color: DAILY_BACKGROUND_COLOR,
                tension: 0.4,
                fill: true,
            }],
        }
    }
}

#[derive(Serialize, Debug)]
pub struct JsonHeatmap {
    heatmap_html: String,
    year: i32,
    available_years: Vec<i32>,
    total_duels: u64,
}

pub async fn dispatch(state: &AppState, action: &str, params: &QueryParams) -> Response {
    log::debug!("AJAX request `{}`", action);
    let result = match action {
        "get_duels_page" => get_duels_page(state, params).await,
        "get_duel_details" => get_duel_details(state, params).await,
        "search_players" => search_players(state, params).await,
        "get_players_page" => get_players_page(state, params).await,
        "get_profile_duels_page" => get_profile_duels_page(state, params).await,
        "get_player_nickname" => get_player_nickname(state, params).await,
        "get_daily_duels" => get_daily_duels(state, params).await,
        "get_activity_heatmap" => get_activity_heatmap(state, params).await,
        _ => Err(ServiceError::BadRequest(format!("Unknown action `{}`", action))),
    };
    result.unwrap_or_else(IntoResponse::into_response)
}

async fn get_duels_page(state: &AppState, params: &QueryParams) -> Result<Response, ServiceError> {
    let page = state
        .app
        .duel_list_use_case
        .list_duels(params.page("page"), params.duel_sort())
        .await;
    Ok(Json(JsonDuelsPage::<JsonDuel>::from_page(page)).into_response())
}

async fn get_duel_details(
    state: &AppState,
    params: &QueryParams,
) -> Result<Response, ServiceError> {
    let kind = DuelKind::from_param(params.get("type").unwrap_or_default());
    let duel = match params.int("duel_id") {
        Some(id) => state.app.duel_get_use_case.get_duel(kind, id).await,
        None => None,
    };
    let duel = duel.map(JsonDuel::from);
    Ok(Json(serde_json::json!({ "duel": duel })).into_response())
}

async fn search_players(state: &AppState, params: &QueryParams) -> Result<Response, ServiceError> {
    let text = params.text("q").unwrap_or_default();
    let players = state
        .app
        .player_search_use_case
        .suggest(text, params.player_sort())
        .await;
    let players: Vec<JsonPlayer> = players.into_iter().map(JsonPlayer::from).collect();
    Ok(Json(serde_json::json!({ "players": players })).into_response())
}

async fn get_players_page(
    state: &AppState,
    params: &QueryParams,
) -> Result<Response, ServiceError> {
    let page = state
        .app
        .player_list_use_case
        .list_players(params.page("page"), params.player_sort())
        .await;
    Ok(Json(JsonPlayersPage {
        current_page: page.pagination.page,
        total_pages: page.total_pages(),
        total_players: page.total_count,
        players: page.items.into_iter().map(JsonPlayer::from).collect(),
    })
    .into_response())
}

async fn get_profile_duels_page(
    state: &AppState,
    params: &QueryParams,
) -> Result<Response, ServiceError> {
    let steam_id = params.text("steam_id").unwrap_or_default();
    let page = state
        .app
        .profile_duels_use_case
        .list_player_duels(steam_id, params.page("page"))
        .await;
    Ok(Json(JsonDuelsPage::<JsonPlayerDuel>::from_page(page)).into_response())
}

async fn get_player_nickname(
    state: &AppState,
    params: &QueryParams,
) -> Result<Response, ServiceError> {
    let steam_id = params.text("steam_id").unwrap_or_default();
    let nickname = state.app.nickname_resolver_service.resolve(steam_id).await;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        nickname,
    )
        .into_response())
}

async fn get_daily_duels(state: &AppState, params: &QueryParams) -> Result<Response, ServiceError> {
    let steam_id = params.text("steam_id").unwrap_or_default();
    let date = params
        .text("date")
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok());
    let hours = state
        .app
        .activity_daily_use_case
        .get_hourly(steam_id, date)
        .await;
    Ok(Json(JsonDailyChart::from_hours(&hours)).into_response())
}

async fn get_activity_heatmap(
    state: &AppState,
    params: &QueryParams,
) -> Result<Response, ServiceError> {
    let steam_id = params
        .text("steam_id")
        .ok_or_else(|| ServiceError::BadRequest("Missing steam_id".to_string()))?;
    let heatmaps = &state.app.activity_heatmap_use_case;
    let activity = match params.int("year").and_then(|year| i32::try_from(year).ok()) {
        Some(year) => heatmaps.get_heatmap_of_year(steam_id, year).await,
        None => heatmaps.get_heatmap(steam_id, None).await,
    }
    .ok_or_else(|| ServiceError::Internal("Could not build the heatmap".to_string()))?;
    Ok(Json(JsonHeatmap {
        heatmap_html: heatmap(&activity).into_string(),
        year: activity.year,
        total_duels: activity.layout.total(),
        available_years: activity.years,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use mge_stats_app::{
        domain::MAX_PAGE,
        mocks::{MockStore, duel, player, slot, team_duel},
    };

    use crate::test_support::{body_json, body_text, get, test_router};

    fn store() -> MockStore {
        let store = MockStore::default();
        store.add_player(player("STEAM_0:0:1", Some("Alpha"), 1800, 7, 3));
        store.add_player(player("STEAM_0:0:2", Some("Bravo"), 1600, 2, 2));
        store.add_player(player("STEAM_0:0:3", None, 1400, 0, 4));
        store.add_duel(duel(
            1,
            1_700_000_000,
            slot("STEAM_0:0:1", "scout", 1500, 1512),
            slot("STEAM_0:0:2", "soldier", 1500, 1488),
        ));
        store.add_duel(team_duel(
            2,
            1_700_003_600,
            (slot("STEAM_0:0:3", "soldier", 1400, 1410), slot("STEAM_0:0:1", "medic", 1512, 1537)),
            (slot("STEAM_0:0:2", "demoman", 1488, 1470), slot("STEAM_0:0:9", "scout", 1500, 1480)),
        ));
        store
    }

    #[tokio::test]
    async fn test_players_page() {
        let response = get(test_router(&store()), "/?ajax=get_players_page&page=1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["current_page"], 1);
        assert_eq!(json["total_pages"], 1);
        assert_eq!(json["total_players"], 3);
        assert_eq!(json["players"][0]["nick"], "Alpha");
        assert_eq!(json["players"][0]["winrate"], 70.0);
        assert_eq!(json["players"][2]["nick"], "STEAM_0:0:3");
    }

    #[tokio::test]
    async fn test_duels_page_has_nicknames() {
        let json = body_json(get(test_router(&store()), "/?ajax=get_duels_page&page=abc").await).await;
        assert_eq!(json["current_page"], 1);
        assert_eq!(json["total_duels"], 2);
        let newest = &json["duels"][0];
        assert_eq!(newest["type"], "2v2");
        assert_eq!(newest["winner2_nick"], "Alpha");
        assert_eq!(newest["loser2_nick"], "STEAM_0:0:9");
        let oldest = &json["duels"][1];
        assert_eq!(oldest["type"], "1v1");
        assert_eq!(oldest["winner_nick"], "Alpha");
        assert!(oldest.get("winner2").is_none());
    }

    #[tokio::test]
    async fn test_huge_page_is_clamped() {
        let router = test_router(&store());
        for action in ["get_players_page", "get_duels_page"] {
            let uri = format!("/?ajax={}&page=99999999999999999999", action);
            let response = get(router.clone(), &uri).await;
            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            assert_eq!(json["current_page"], MAX_PAGE);
        }
        let json = body_json(
            get(
                router,
                "/?ajax=get_profile_duels_page&steam_id=STEAM_0:0:1&page=99999999999999999999",
            )
            .await,
        )
        .await;
        assert_eq!(json["current_page"], MAX_PAGE);
        assert_eq!(json["duels"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_duel_details() {
        let router = test_router(&store());
        let json = body_json(get(router.clone(), "/?ajax=get_duel_details&duel_id=2&type=2v2").await).await;
        assert_eq!(json["duel"]["id"], 2);
        assert_eq!(json["duel"]["winner2"], "STEAM_0:0:1");

        let json = body_json(get(router, "/?ajax=get_duel_details&duel_id=2&type=1v1").await).await;
        assert!(json["duel"].is_null());
    }

    #[tokio::test]
    async fn test_profile_duels_use_own_slot() {
        let json = body_json(
            get(test_router(&store()), "/?ajax=get_profile_duels_page&steam_id=STEAM_0:0:1").await,
        )
        .await;
        assert_eq!(json["total_duels"], 2);
        assert_eq!(json["duels"][0]["is_winner"], true);
        assert_eq!(json["duels"][0]["elo_change"], 25);
        assert_eq!(json["duels"][1]["elo_change"], 12);
    }

    #[tokio::test]
    async fn test_search_players() {
        let json = body_json(get(test_router(&store()), "/?ajax=search_players&q=Bravo").await).await;
        assert_eq!(json["players"][0]["steamid"], "STEAM_0:0:2");
    }

    #[tokio::test]
    async fn test_nickname_is_plain_text() {
        let response = get(test_router(&store()), "/?ajax=get_player_nickname&steam_id=STEAM_0:0:2").await;
        assert!(
            response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
        assert_eq!(body_text(response).await, "Bravo");
    }

    #[tokio::test]
    async fn test_daily_chart() {
        let json = body_json(
            get(
                test_router(&store()),
                "/?ajax=get_daily_duels&steam_id=STEAM_0:0:1&date=2023-11-14",
            )
            .await,
        )
        .await;
        assert_eq!(json["labels"].as_array().unwrap().len(), 24);
        assert_eq!(json["labels"][0], "00:00");
        assert_eq!(json["labels"][23], "23:00");
        let dataset = &json["datasets"][0];
        assert_eq!(dataset["borderColor"], "rgb(74, 222, 128)");
        assert_eq!(dataset["fill"], true);
        assert_eq!(dataset["data"][22], 1);
        assert_eq!(dataset["data"][23], 1);
    }

    #[tokio::test]
    async fn test_invalid_date_is_empty_chart() {
        let json = body_json(
            get(
                test_router(&store()),
                "/?ajax=get_daily_duels&steam_id=STEAM_0:0:1&date=yesterday",
            )
            .await,
        )
        .await;
        let data = json["datasets"][0]["data"].as_array().unwrap();
        assert!(data.iter().all(|count| count == 0));
    }

    #[tokio::test]
    async fn test_heatmap_requires_steam_id() {
        let response = get(test_router(&store()), "/?ajax=get_activity_heatmap&year=2023").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_heatmap_renders_requested_year() {
        let router = test_router(&store());
        let json = body_json(
            get(
                router.clone(),
                "/?ajax=get_activity_heatmap&steam_id=STEAM_0:0:1&year=1999",
            )
            .await,
        )
        .await;
        assert_eq!(json["year"], 1999);
        assert_eq!(json["available_years"], serde_json::json!([2023]));
        assert_eq!(json["total_duels"], 0);
        assert!(json["heatmap_html"].as_str().unwrap().contains("<svg"));

        let json = body_json(
            get(
                router,
                "/?ajax=get_activity_heatmap&steam_id=STEAM_0:0:1&year=abc",
            )
            .await,
        )
        .await;
        assert_eq!(json["year"], 2023);
        assert_eq!(json["total_duels"], 2);
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let response = get(test_router(&store()), "/?ajax=drop_tables").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
