use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

const DASHBOARD_JS: &str = include_str!("../assets/dashboard.js");
const PROFILE_JS: &str = include_str!("../assets/profile.js");
const STYLE_CSS: &str = include_str!("../assets/style.css");

const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
const CSS: &str = "text/css; charset=utf-8";

fn embedded(file: &str) -> Option<(&'static str, &'static str)> {
    match file {
        "dashboard.js" => Some((DASHBOARD_JS, JAVASCRIPT)),
        "profile.js" => Some((PROFILE_JS, JAVASCRIPT)),
        "style.css" => Some((STYLE_CSS, CSS)),
        _ => None,
    }
}

pub async fn asset(Path(file): Path<String>) -> Response {
    match embedded(&file) {
        Some((body, content_type)) => (
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            body,
        )
            .into_response(),
        None => {
            log::debug!("Unknown asset `{}` requested", file);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
