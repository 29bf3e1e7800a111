use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub default_page_limit: u64,
    pub max_page_limit: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://themetadb.db?mode=rwc".to_string());

        let db_max_connections: u32 =
            std::env::var("DB_MAX_CONNECTIONS").ok().and_then(|s| s.parse().ok()).unwrap_or(5);

        let default_page_limit: u64 =
            std::env::var("DEFAULT_PAGE_LIMIT").ok().and_then(|s| s.parse().ok()).unwrap_or(100);

        let max_page_limit: u64 =
            std::env::var("MAX_PAGE_LIMIT").ok().and_then(|s| s.parse().ok()).unwrap_or(1000);

        let (default_page_limit, max_page_limit) =
            bounded_page_limits(default_page_limit, max_page_limit);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            db_max_connections,
            default_page_limit,
            max_page_limit,
        })
    }

    /// Configuration backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            default_page_limit: 100,
            max_page_limit: 1000,
        }
    }

    pub fn page_limit(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.default_page_limit).min(self.max_page_limit)
    }
}

/// SQLite binds LIMIT as a signed 64-bit integer, and the default never
/// exceeds the maximum.
fn bounded_page_limits(default: u64, max: u64) -> (u64, u64) {
    let max = max.max(default).min(i64::MAX as u64);
    (default.min(max), max)
}
