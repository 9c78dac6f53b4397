use mge_stats_app::domain::{RepoError, StorageHealth};
use sqlx::{
    MySql, Pool,
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
};

pub mod activity;
pub mod duels;
pub mod matchups;
pub mod players;

const DEFAULT_PORT: u16 = 3306;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Participant filters of the two duel tables.
pub(crate) const ONE_VS_ONE_PARTICIPANT: &str = "(winner = ? OR loser = ?)";
pub(crate) const TWO_VS_TWO_PARTICIPANT: &str =
    "(winner = ? OR winner2 = ? OR loser = ? OR loser2 = ?)";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

impl MysqlConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: required("MARIADB_HOST")?,
            port: parsed_or("MARIADB_PORT", DEFAULT_PORT)?,
            username: required("MARIADB_USER")?,
            password: std::env::var("MARIADB_PASSWORD").unwrap_or_default(),
            database: required("MARIADB_DATABASE")?,
            max_connections: parsed_or("MGE_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
        })
    }
}

/// Lazily connecting pool; sessions run in UTC so date functions agree with the app.
pub fn create_db_pool(config: &MysqlConfig) -> Pool<MySql> {
    let conn_options = MySqlConnectOptions::new()
        .username(&config.username)
        .password(&config.password)
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .charset("utf8mb4")
        .timezone(Some(String::from("+00:00")));

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy_with(conn_options)
}

/// Escapes `LIKE` wildcards and wraps the text for a substring match.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn storage_error(e: sqlx::Error) -> RepoError {
    RepoError::StorageError(e.to_string())
}

pub(crate) fn to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

pub struct MysqlHealthCheck {
    pool: Pool<MySql>,
}

impl MysqlHealthCheck {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StorageHealth for MysqlHealthCheck {
    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}
