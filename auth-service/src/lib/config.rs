use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgSslMode;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_seconds() -> u64 {
    5
}

impl DatabaseConfig {
    /// Connection options built from the individual parameters.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Prefer)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__HOST, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment())
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

/// Unprefixed variables with `__` between sections,
/// e.g. `DATABASE__HOST=db.internal` overrides `database.host`.
fn environment() -> Environment {
    Environment::default().separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(
                r#"
                [database]
                host = "db"
                port = 5433
                user = "auth"
                password = "hunter2"
                name = "credentials"

                [server]
                http_port = 8089

                [jwt]
                secret = "test-secret"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();

        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(5));
        assert_eq!(config.server.http_port, 8089);
        assert_eq!(config.jwt.secret, "test-secret");
    }

    #[test]
    fn test_environment_overrides_file() {
        let variables = config::Map::from([
            ("JWT__SECRET".to_string(), "from-env-secret".to_string()),
            ("DATABASE__HOST".to_string(), "db.from.env".to_string()),
        ]);

        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(
                r#"
                [database]
                host = "localhost"
                port = 5432
                user = "auth"
                password = "hunter2"
                name = "credentials"

                [server]
                http_port = 8089

                [jwt]
                secret = "file-secret"
                "#,
                config::FileFormat::Toml,
            ))
            .add_source(environment().source(Some(variables)))
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();

        assert_eq!(config.jwt.secret, "from-env-secret");
        assert_eq!(config.database.host, "db.from.env");
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn test_connect_options() {
        let database = DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            user: "auth".to_string(),
            password: "hunter2".to_string(),
            name: "credentials".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 5,
        };

        let options = database.connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "auth");
        assert_eq!(options.get_database(), Some("credentials"));
    }
}
