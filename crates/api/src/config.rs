use serde::Deserialize;
use std::net::SocketAddr;

/// Upper bound for `discord.max_retries`.
const MAX_DISCORD_RETRIES: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// Message composition behavior
    #[serde(default)]
    pub composition: CompositionConfig,
    /// Discord chat integration
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Giphy celebration GIFs
    #[serde(default)]
    pub giphy: GiphyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompositionConfig {
    /// Reject a second message for the same user and sprint
    #[serde(default = "default_suppress_duplicates")]
    pub suppress_duplicates: bool,

    /// Upper bound for resolving a chat mention before composing
    #[serde(default = "default_mention_lookup_timeout_ms")]
    pub mention_lookup_timeout_ms: u64,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            suppress_duplicates: default_suppress_duplicates(),
            mention_lookup_timeout_ms: default_mention_lookup_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub bot_token: String,

    #[serde(default)]
    pub channel_id: String,

    #[serde(default)]
    pub guild_id: String,

    #[serde(default = "default_discord_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_discord_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries on 5xx and transport errors, at most 10
    #[serde(default = "default_discord_max_retries")]
    pub max_retries: u32,

    /// Replace usernames with `<@id>` mentions when a guild member matches
    #[serde(default = "default_resolve_mentions")]
    pub resolve_mentions: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            channel_id: String::new(),
            guild_id: String::new(),
            api_base_url: default_discord_api_base_url(),
            timeout_ms: default_discord_timeout_ms(),
            max_retries: default_discord_max_retries(),
            resolve_mentions: default_resolve_mentions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GiphyConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_giphy_tag")]
    pub tag: String,

    #[serde(default = "default_giphy_rating")]
    pub rating: String,

    #[serde(default = "default_giphy_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_giphy_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            tag: default_giphy_tag(),
            rating: default_giphy_rating(),
            api_base_url: default_giphy_api_base_url(),
            timeout_ms: default_giphy_timeout_ms(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    5
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_suppress_duplicates() -> bool {
    true
}
fn default_mention_lookup_timeout_ms() -> u64 {
    2000
}
fn default_discord_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}
fn default_discord_timeout_ms() -> u64 {
    10000
}
fn default_discord_max_retries() -> u32 {
    2
}
fn default_resolve_mentions() -> bool {
    true
}
fn default_giphy_tag() -> String {
    "celebrate".to_string()
}
fn default_giphy_rating() -> String {
    "g".to_string()
}
fn default_giphy_api_base_url() -> String {
    "https://api.giphy.com/v1".to_string()
}
fn default_giphy_timeout_ms() -> u64 {
    5000
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with KUDOS__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("KUDOS").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults so tests do not depend on
    /// the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 3000
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 5
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [composition]
            suppress_duplicates = true
            mention_lookup_timeout_ms = 2000

            [discord]
            enabled = false

            [giphy]
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "KUDOS__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.discord.enabled {
            for (name, value) in [
                ("KUDOS__DISCORD__BOT_TOKEN", &self.discord.bot_token),
                ("KUDOS__DISCORD__CHANNEL_ID", &self.discord.channel_id),
                ("KUDOS__DISCORD__GUILD_ID", &self.discord.guild_id),
            ] {
                if value.is_empty() {
                    return Err(ConfigValidationError::MissingRequired(format!(
                        "{} must be set when Discord is enabled",
                        name
                    )));
                }
            }
        }

        if self.discord.max_retries > MAX_DISCORD_RETRIES {
            return Err(ConfigValidationError::InvalidValue(format!(
                "discord.max_retries cannot exceed {}",
                MAX_DISCORD_RETRIES
            )));
        }

        if self.giphy.enabled && self.giphy.api_key.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "KUDOS__GIPHY__API_KEY must be set when Giphy is enabled".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ConfigValidationError::InvalidValue(format!("Invalid socket address: {}", e))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_DB: &str = "sqlite://kudos-test.db";

    #[test]
    fn test_config_load_with_defaults() {
        let config =
            Config::load_for_test(&[("database.url", TEST_DB)]).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.composition.suppress_duplicates);
        assert!(!config.discord.enabled);
        assert_eq!(config.discord.api_base_url, "https://discord.com/api/v10");
        assert_eq!(config.giphy.tag, "celebrate");
        assert_eq!(config.giphy.rating, "g");
    }

    #[test]
    fn test_config_env_override() {
        let config = Config::load_for_test(&[
            ("database.url", TEST_DB),
            ("server.port", "9000"),
            ("logging.level", "debug"),
            ("composition.suppress_duplicates", "false"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.composition.suppress_duplicates);
    }

    #[test]
    fn test_config_validation_missing_db_url() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");
        let result = config.validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("KUDOS__DATABASE__URL"));
    }

    #[test]
    fn test_config_validation_invalid_pool_settings() {
        let config = Config::load_for_test(&[
            ("database.url", TEST_DB),
            ("database.min_connections", "100"),
            ("database.max_connections", "10"),
        ])
        .expect("Failed to load config");

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("min_connections"));
    }

    #[test]
    fn test_config_validation_discord_requires_credentials() {
        let config = Config::load_for_test(&[
            ("database.url", TEST_DB),
            ("discord.enabled", "true"),
            ("discord.bot_token", "token"),
        ])
        .expect("Failed to load config");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("KUDOS__DISCORD__CHANNEL_ID"));
    }

    #[test]
    fn test_config_validation_caps_discord_retries() {
        let config = Config::load_for_test(&[
            ("database.url", TEST_DB),
            ("discord.max_retries", "100"),
        ])
        .expect("Failed to load config");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("discord.max_retries"));

        let config = Config::load_for_test(&[
            ("database.url", TEST_DB),
            ("discord.max_retries", "10"),
        ])
        .expect("Failed to load config");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_giphy_requires_key() {
        let config = Config::load_for_test(&[("database.url", TEST_DB), ("giphy.enabled", "true")])
            .expect("Failed to load config");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("KUDOS__GIPHY__API_KEY"));
    }

    #[test]
    fn test_config_validation_ok() {
        let config = Config::load_for_test(&[
            ("database.url", TEST_DB),
            ("discord.enabled", "true"),
            ("discord.bot_token", "token"),
            ("discord.channel_id", "123"),
            ("discord.guild_id", "456"),
        ])
        .expect("Failed to load config");

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[
            ("database.url", TEST_DB),
            ("server.host", "127.0.0.1"),
            ("server.port", "3000"),
        ])
        .expect("Failed to load config");

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_database_config_conversion() {
        let config =
            Config::load_for_test(&[("database.url", TEST_DB)]).expect("Failed to load config");
        let pool_config: persistence::db::DatabaseConfig = (&config.database).into();
        assert_eq!(pool_config.url, TEST_DB);
        assert_eq!(pool_config.max_connections, 5);
    }
}
