//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use yatube_infra::{DatabaseConfig, JwtConfig};

pub const DEFAULT_LOGIN_URL: &str = "/auth/login/";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Where anonymous visitors of the create/edit pages are sent.
    pub login_url: String,
    pub jwt: JwtConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            login_url: DEFAULT_LOGIN_URL.to_string(),
            jwt: JwtConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = env_parse("DB_MAX_CONNECTIONS").unwrap_or(config.max_connections);
            config.min_connections = env_parse("DB_MIN_CONNECTIONS").unwrap_or(config.min_connections);
            config.sql_logging = env_parse("DB_SQL_LOGGING").unwrap_or(config.sql_logging);
            config
        });

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT").unwrap_or(defaults.port),
            database,
            login_url: env::var("LOGIN_URL").unwrap_or(defaults.login_url),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
