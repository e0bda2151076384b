use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

// Password stays out of logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl DbConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub app_host: String,
    pub app_port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `DB_PASSWORD` has no
    /// fallback; everything else defaults to a local-development value.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let db = DbConfig {
            host: or("DB_HOST", "127.0.0.1"),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            user: or("DB_USER", "postgres"),
            password: lookup("DB_PASSWORD").context("DB_PASSWORD must be set")?,
            name: or("DB_NAME", "accounts"),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 30)?),
        };

        Ok(Self {
            db,
            app_host: or("APP_HOST", "0.0.0.0"),
            app_port: parse_or(&lookup, "APP_PORT", 8080)?,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.app_host, self.app_port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.app_host, self.app_port))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} is not a valid value: {raw:?}")),
        None => Ok(default),
    }
}
