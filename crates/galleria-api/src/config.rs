//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/galleria` |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `RUN_MIGRATIONS` | `true` |
//! | `RATE_LIMIT_ENABLED` | `true` |
//! | `RATE_LIMIT_REQUESTS` / `RATE_LIMIT_PERIOD_SECS` | `100` / `60` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `LOG_FORMAT` / `LOG_FILE` / `LOG_ANSI` | `text` / stdout / auto |

use std::str::FromStr;

use galleria_core::defaults;
use galleria_db::pool::DEFAULT_MAX_CONNECTIONS;

/// Default allowed CORS origins when `ALLOWED_ORIGINS` is unset or empty.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// "json" or "text".
    pub format: String,
    /// Optional log file; rotated daily.
    pub file: Option<String>,
    /// Force ANSI colors on or off; auto-detected when `None`.
    pub ansi: Option<bool>,
}

/// Rate limiter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests: u64,
    pub period_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub rate_limit: RateLimitConfig,
    pub allowed_origins: Vec<String>,
    pub log: LogConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let origins = lookup("ALLOWED_ORIGINS")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost/galleria".to_string()),
            host: lookup("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string()),
            port: parse_or(&lookup, "PORT", defaults::SERVER_PORT),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)
                .max(1),
            run_migrations: flag_or(&lookup, "RUN_MIGRATIONS", true),
            rate_limit: RateLimitConfig {
                enabled: flag_or(&lookup, "RATE_LIMIT_ENABLED", true),
                requests: parse_or(&lookup, "RATE_LIMIT_REQUESTS", defaults::RATE_LIMIT_REQUESTS)
                    .max(1),
                period_secs: parse_or(
                    &lookup,
                    "RATE_LIMIT_PERIOD_SECS",
                    defaults::RATE_LIMIT_PERIOD_SECS,
                )
                .max(1),
            },
            allowed_origins: origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            log: LogConfig {
                format: lookup("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
                file: lookup("LOG_FILE").filter(|s| !s.is_empty()),
                ansi: lookup("LOG_ANSI").map(|v| v == "true" || v == "1"),
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            // Logging may not be initialised yet; eprintln keeps this visible.
            eprintln!("warning: invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}
