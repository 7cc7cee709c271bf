/**
 * Server Configuration
 *
 * This module loads server configuration from environment variables
 * (optionally seeded from a `.env` file by the binary) and opens the
 * optional PostgreSQL connection pool.
 *
 * # Variables
 *
 * | Variable | Default |
 * |---|---|
 * | `SERVER_PORT` / `PORT` | `3000` |
 * | `DATABASE_URL` | unset: database routes answer 503, chat history kept in memory |
 * | `JWT_SECRET` | development fallback, logged as a warning |
 * | `CORS_ORIGIN` | `http://localhost:5173` |
 * | `UPLOAD_DIR` | `uploads` |
 * | `TOKEN_TTL_HOURS` | `3` |
 *
 * # Error Handling
 *
 * Malformed numeric values are a `ConfigError`. A database that cannot be
 * reached is logged and the server continues without it.
 */

use std::net::SocketAddr;
use std::path::PathBuf;

use sqlx::PgPool;
use thiserror::Error;

/// Secret used when `JWT_SECRET` is missing
pub const DEV_JWT_SECRET: &str = "agora-dev-secret-change-in-production";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (all interfaces)
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: Option<String>,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Browser origin allowed to send credentialed requests
    pub cors_origin: String,
    /// Directory served under `/uploads`
    pub upload_dir: PathBuf,
    /// Session token lifetime
    pub token_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            upload_dir: PathBuf::from("uploads"),
            token_ttl_hours: 3,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("SERVER_PORT").or_else(|| non_empty("PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let token_ttl_hours = match non_empty("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "TOKEN_TTL_HOURS",
                        value: raw,
                    })
                }
            },
            None => defaults.token_ttl_hours,
        };

        let jwt_secret = match non_empty("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        Ok(Self {
            port,
            database_url: non_empty("DATABASE_URL"),
            jwt_secret,
            cors_origin: non_empty("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            upload_dir: non_empty("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            token_ttl_hours,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Database configuration result
///
/// `None` when the database is not configured or unreachable.
pub type DatabaseConfig = Option<PgPool>;

/// Connect to PostgreSQL and run migrations
///
/// Errors are logged and turn into `None`; the server keeps running without
/// database-backed routes.
pub async fn load_database(database_url: Option<&str>) -> DatabaseConfig {
    let database_url = match database_url {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - schema might not be up to date");
        }
    }

    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, None);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert_eq!(config.token_ttl_hours, 3);
    }

    #[test]
    fn test_server_port_wins_over_port() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("SERVER_PORT", "8080"),
            ("PORT", "9090"),
            ("DATABASE_URL", "postgres://localhost/agora"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/agora"));
        assert_eq!(config.bind_addr().port(), 8080);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue { name: "SERVER_PORT", value: "http".to_string() });

        let err = ServerConfig::from_lookup(lookup_from(&[("TOKEN_TTL_HOURS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "TOKEN_TTL_HOURS", .. }));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  "), ("JWT_SECRET", "")])).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("TOKEN_TTL_HOURS", "12");
        let config = ServerConfig::from_env();
        std::env::remove_var("TOKEN_TTL_HOURS");
        assert_eq!(config.unwrap().token_ttl_hours, 12);
    }
}
