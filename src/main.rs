use std::sync::Arc;

use log::{LevelFilter, error, info};
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use mge_persistence_mysql::{
    ConfigError, MysqlConfig, MysqlHealthCheck, activity::ActivityRepositoryImpl,
    create_db_pool, duels::DuelRepositoryImpl, matchups::MatchupRatingRepositoryImpl,
    players::PlayerRepositoryImpl,
};
use mge_stats_api::{HttpConfig, HttpConfigError};
use mge_stats_app::build_application;
use mge_steam::{SteamConfig, SteamError, SteamOpenIdProvider, SteamProfileService};
use thiserror::Error;

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

const LOG_PATTERN: &str = "{d} {l} {t} - {m}{n}";

#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to initialize logging: {0}")]
    Logger(String),
    #[error("database configuration: {0}")]
    Database(#[from] ConfigError),
    #[error("http configuration: {0}")]
    Http(#[from] HttpConfigError),
    #[error("steam configuration: {0}")]
    Steam(#[from] SteamError),
    #[error("http server: {0}")]
    Io(#[from] std::io::Error),
}

/// Rolling debug log file, enabled when both LOG_FILE_PATH and LOG_ARCHIVE_PATTERN are set.
fn file_appender() -> Result<Option<Appender>, StartupError> {
    let (Ok(file_path), Ok(archive_pattern)) = (
        std::env::var("LOG_FILE_PATH"),
        std::env::var("LOG_ARCHIVE_PATTERN"),
    ) else {
        return Ok(None);
    };

    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let roller = FixedWindowRoller::builder()
        .build(&archive_pattern, LOG_FILE_COUNT)
        .map_err(|e| StartupError::Logger(e.to_string()))?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(file_path, Box::new(policy))
        .map_err(|e| StartupError::Logger(e.to_string()))?;

    Ok(Some(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
            .build("logfile", Box::new(logfile)),
    ))
}

fn init_logger() -> Result<(), StartupError> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(LevelFilter::Info)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");
    if let Some(logfile) = file_appender()? {
        config = config.appender(logfile);
        root = root.appender("logfile");
    }

    let config = config
        .build(root.build(LevelFilter::Debug))
        .map_err(|e| StartupError::Logger(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| StartupError::Logger(e.to_string()))?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

async fn run() -> Result<(), StartupError> {
    let db_config = MysqlConfig::from_env()?;
    let http_config = HttpConfig::from_env()?;
    let steam_config = SteamConfig::from_env();

    let pool = create_db_pool(&db_config);
    info!(
        "Using database {} at {}:{}",
        db_config.database, db_config.host, db_config.port
    );

    let player_repo = Arc::new(PlayerRepositoryImpl::new(pool.clone()));
    let duel_repo = Arc::new(DuelRepositoryImpl::new(pool.clone()));
    let matchup_repo = Arc::new(MatchupRatingRepositoryImpl::new(pool.clone()));
    let activity_repo = Arc::new(ActivityRepositoryImpl::new(pool.clone()));
    let storage_health = Arc::new(MysqlHealthCheck::new(pool));

    if !steam_config.profile_lookups_enabled() {
        info!("STEAM_API_KEY is not set, Steam profiles fall back to placeholders");
    }
    let identity_provider = Arc::new(SteamOpenIdProvider::new(&steam_config)?);
    let steam_profiles = Arc::new(SteamProfileService::new(&steam_config)?);

    let app = Arc::new(build_application(
        player_repo,
        duel_repo,
        matchup_repo,
        activity_repo,
        steam_profiles,
        identity_provider,
        storage_health,
    ));

    info!("Starting application");
    mge_stats_api::serve(app, http_config, shutdown_signal()).await?;
    info!("Application shut down");
    Ok(())
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    if let Err(e) = init_logger() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {}", e);
    }

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
