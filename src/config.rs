//! Environment-driven configuration for the storage backend and the HTTP server.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;

/// Value of `HBNB_ENV`. `Test` resets the schema on the first reload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Dev,
    Test,
}

impl Environment {
    fn parse(s: Option<&str>) -> Self {
        match s {
            Some("test") => Environment::Test,
            _ => Environment::Dev,
        }
    }
}

/// Connection parameters for the relational backend.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub env: Environment,
    /// Takes precedence over the discrete parameters when set.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            user: "hbnb_dev".into(),
            password: None,
            host: "localhost".into(),
            port: 5432,
            database: "hbnb_dev_db".into(),
            env: Environment::Dev,
            database_url: None,
            max_connections: 5,
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue { var, value: v }),
    }
}

impl StorageConfig {
    /// Read `HBNB_PG_*`, `HBNB_ENV`, `HBNB_MAX_CONNECTIONS` and `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            user: get("HBNB_PG_USER").unwrap_or(d.user),
            password: get("HBNB_PG_PWD"),
            host: get("HBNB_PG_HOST").unwrap_or(d.host),
            port: parse_var("HBNB_PG_PORT", get("HBNB_PG_PORT"), d.port)?,
            database: get("HBNB_PG_DB").unwrap_or(d.database),
            env: Environment::parse(get("HBNB_ENV").as_deref()),
            database_url: get("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            max_connections: parse_var("HBNB_MAX_CONNECTIONS", get("HBNB_MAX_CONNECTIONS"), d.max_connections)?,
        })
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.database_url {
            return PgConnectOptions::from_str(url).map_err(|e| ConfigError::DatabaseUrl(e.to_string()));
        }
        let mut opts = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);
        if let Some(pwd) = &self.password {
            opts = opts.password(pwd);
        }
        Ok(opts)
    }
}

/// Bind address for the API server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Read `HBNB_API_HOST` (default `0.0.0.0`) and `HBNB_API_PORT` (default `5000`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: get("HBNB_API_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_var("HBNB_API_PORT", get("HBNB_API_PORT"), 5000)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
