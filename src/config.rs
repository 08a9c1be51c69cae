use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use foodgram_recipe::ShortLinkPolicy;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub short_link: ShortLinkConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public origin used to build absolute short links.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShortLinkConfig {
    pub length: usize,
    pub max_attempts: usize,
    pub insert_retries: usize,
}

impl Default for ShortLinkConfig {
    fn default() -> Self {
        let policy = ShortLinkPolicy::default();

        Self {
            length: policy.length,
            max_attempts: policy.max_attempts,
            insert_retries: policy.insert_retries,
        }
    }
}

impl From<&ShortLinkConfig> for ShortLinkPolicy {
    fn from(value: &ShortLinkConfig) -> Self {
        Self {
            length: value.length,
            max_attempts: value.max_attempts,
            insert_retries: value.insert_retries,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (FOODGRAM__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.base_url", "http://localhost:8000")?
            .set_default("database.url", "sqlite:foodgram.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_days", 7)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("FOODGRAM")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.jwt.expiration_days < 1 {
            return Err("JWT expiration_days must be at least 1".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        ShortLinkPolicy::from(&self.short_link)
            .validate()
            .map_err(|e| e.to_string())
    }

    pub fn token_settings(&self) -> foodgram_user::TokenSettings {
        foodgram_user::TokenSettings {
            secret: self.jwt.secret.to_owned(),
            lifetime_seconds: self.jwt.expiration_days * 24 * 60 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                base_url: "http://localhost:8000".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "test_secret_key_minimum_32_characters_long".to_string(),
                expiration_days: 7,
            },
            observability: ObservabilityConfig::default(),
            short_link: ShortLinkConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validation_short_secret() {
        let mut config = valid();
        config.jwt.secret = "short".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = valid();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = valid();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_short_link_bounds() {
        let mut config = valid();
        config.short_link.length = 0;
        assert!(config.validate().is_err());

        config.short_link.length = 63;
        assert!(config.validate().is_err());

        config.short_link.length = 62;
        assert!(config.validate().is_ok());

        config.short_link.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.short_link.insert_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_link_defaults() {
        let policy = ShortLinkPolicy::from(&ShortLinkConfig::default());

        assert_eq!(policy, ShortLinkPolicy::default());
        assert_eq!(policy.length, 8);
    }

    #[test]
    fn test_token_lifetime() {
        assert_eq!(valid().token_settings().lifetime_seconds, 7 * 86400);
    }
}
