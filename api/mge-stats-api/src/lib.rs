use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use log::info;
use mge_stats_app::Application;
use thiserror::Error;
use tower_http::services::ServeDir;

mod ajax;
mod assets;
mod dashboard;
mod params;
mod session;
mod views;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CLASS_ICON_DIR: &str = "static/classes";

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

#[derive(Debug, Error)]
pub enum HttpConfigError {
    #[error("invalid MGE_HTTP_PORT `{0}`")]
    InvalidPort(String),
}

#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Directory the class emblem images are served from.
    pub class_icon_dir: PathBuf,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, HttpConfigError> {
        let host = std::env::var("MGE_HTTP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("MGE_HTTP_PORT") {
            Ok(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| HttpConfigError::InvalidPort(port))?,
            Err(_) => DEFAULT_PORT,
        };
        let class_icon_dir = std::env::var("MGE_CLASS_ICON_DIR")
            .unwrap_or_else(|_| DEFAULT_CLASS_ICON_DIR.to_string());
        Ok(Self {
            host,
            port,
            class_icon_dir: PathBuf::from(class_icon_dir),
        })
    }
}

pub fn router(state: AppState, config: &HttpConfig) -> Router {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_storage,
        ))
        .route("/assets/{file}", get(assets::asset))
        .nest_service("/class-icons", ServeDir::new(&config.class_icon_dir))
        .with_state(state)
}

pub async fn serve(
    app: Arc<Application>,
    config: HttpConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let router = router(AppState { app }, &config);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

    info!("Dashboard listening on {}:{}", config.host, config.port);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP server shut down gracefully");
    Ok(())
}

/// Requests fail with a plain-text 503 while the database is unreachable.
async fn require_storage(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Err(e) = state.app.storage_health.ping().await {
        log::error!("Database unreachable: {}", e);
        return ServiceError::Unavailable("Database connection failed".to_string())
            .into_response();
    }
    next.run(request).await
}

#[derive(Debug)]
pub enum ServiceError {
    BadRequest(String),
    Internal(String),
    Unavailable(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ServiceError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Unavailable(msg) => {
                return (StatusCode::SERVICE_UNAVAILABLE, msg).into_response();
            }
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}
