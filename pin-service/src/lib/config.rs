use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Absent means users are kept in memory.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone, Default)]
pub struct JwtConfig {
    /// Validated when the token service derives its key.
    #[serde(default)]
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let jwt = JwtConfig {
            secret: "test-secret-key-1234567890123456".to_string(),
        };
        let rendered = format!("{:?}", jwt);
        assert!(!rendered.contains("test-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_without_database() {
        let configuration = ConfigBuilder::builder()
            .set_override("server.http_port", 9000)
            .unwrap()
            .set_override("jwt.secret", "test-secret-key-1234567890123456")
            .unwrap()
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.jwt.secret, "test-secret-key-1234567890123456");
    }
}
