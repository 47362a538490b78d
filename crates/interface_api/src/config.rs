//! API configuration

use std::time::Duration;

use serde::Deserialize;

use infra_db::DatabaseConfig;

/// Prefix of every environment variable read by [`ApiConfig::from_env`]
pub const ENV_PREFIX: &str = "ESTIMATION";

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Apply pending migrations on startup
    pub run_migrations: bool,
    /// Upper bound of the connection pool
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// Seconds to wait for a connection
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/estimation".to_string(),
            log_level: "info".to_string(),
            run_migrations: true,
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `ESTIMATION__*` environment variables
    ///
    /// Unset keys keep their [`Default`] value.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = ApiConfig::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("run_migrations", defaults.run_migrations)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("min_connections", i64::from(defaults.min_connections))?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs as i64)?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the PostgreSQL store
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr() {
        let config = ApiConfig {
            port: 3000,
            ..ApiConfig::default()
        };
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_database_config_carries_pool_settings() {
        let config = ApiConfig {
            max_connections: 4,
            ..ApiConfig::default()
        };
        let db = config.database_config();
        assert_eq!(db.url, "postgres://localhost/estimation");
        assert_eq!(db.max_connections, 4);
        assert_eq!(db.connect_timeout, Duration::from_secs(30));
    }
}
