use std::str::FromStr;

use anyhow::Context;

/// Output format of the `tracing` fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to the desktop
/// dashboard on one machine.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://biome.db`).
    pub database_url: String,
    /// Pool size (default: `5`).
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on closing the pool after the server stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `127.0.0.1`              |
    /// | `PORT`                  | `3001`                   |
    /// | `DATABASE_URL`          | `sqlite://biome.db`      |
    /// | `DB_MAX_CONNECTIONS`    | `5`                      |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                     |
    /// | `LOG_FORMAT`            | `pretty`                 |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = parse_env("PORT", 3001u16)?;
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://biome.db".into());
        let db_max_connections = parse_env("DB_MAX_CONNECTIONS", 5u32)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30u64)?;
        let shutdown_timeout_secs = parse_env("SHUTDOWN_TIMEOUT_SECS", 30u64)?;
        let log_format = parse_env("LOG_FORMAT", LogFormat::Pretty)?;

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            log_format,
        })
    }
}

/// Read and parse an env var, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
