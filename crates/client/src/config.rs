use serde::Deserialize;

use domain::models::Permission;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub stream: StreamConfig,
    #[serde(default)]
    pub push: PushConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    pub url: String,

    #[serde(default = "default_reconnect_max_backoff")]
    pub reconnect_max_backoff_secs: u64,
}

/// Push messaging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// Whether push registration runs at all.
    #[serde(default = "default_push_enabled")]
    pub enabled: bool,

    /// Base URL of the push gateway (required if enabled).
    #[serde(default)]
    pub gateway_url: String,

    /// Public key handed to the gateway during token acquisition.
    #[serde(default)]
    pub vapid_key: String,

    /// The user's persisted permission decision: default, granted or denied.
    #[serde(default = "default_permission")]
    pub permission: String,

    /// Friendly device name sent with the registration.
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: default_push_enabled(),
            gateway_url: String::new(),
            vapid_key: String::new(),
            permission: default_permission(),
            device_name: default_device_name(),
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

// Default value functions
fn default_request_timeout_ms() -> u64 {
    5000
}
fn default_reconnect_max_backoff() -> u64 {
    30
}
fn default_push_enabled() -> bool {
    true
}
fn default_permission() -> String {
    "default".to_string()
}
fn default_device_name() -> String {
    format!(
        "safehome-client/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
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
    /// 3. Environment variables with SAFEHOME__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SAFEHOME").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds entirely from embedded defaults so tests do not depend on the
    /// filesystem layout.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [backend]
            base_url = "http://localhost:5000"
            request_timeout_ms = 5000

            [stream]
            url = "ws://localhost:5000/alerts"
            reconnect_max_backoff_secs = 30

            [push]
            enabled = true
            gateway_url = "http://localhost:8800"
            vapid_key = "test-vapid-key"
            permission = "default"

            [logging]
            level = "info"
            format = "pretty"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.backend.base_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SAFEHOME__BACKEND__BASE_URL must be set".to_string(),
            ));
        }

        if self.stream.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SAFEHOME__STREAM__URL must be set".to_string(),
            ));
        }

        if self.push.enabled && self.push.gateway_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SAFEHOME__PUSH__GATEWAY_URL must be set when push is enabled".to_string(),
            ));
        }

        if Permission::parse(&self.push.permission).is_none() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "push.permission must be default, granted or denied (got {:?})",
                self.push.permission
            )));
        }

        Ok(())
    }

    /// The initial permission state from configuration.
    ///
    /// Only called after `validate()`, so the value is known to parse.
    pub fn initial_permission(&self) -> Permission {
        Permission::parse(&self.push.permission).unwrap_or(Permission::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.request_timeout_ms, 5000);
        assert_eq!(config.stream.reconnect_max_backoff_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.push.enabled);
    }

    #[test]
    fn test_config_override() {
        let config = Config::load_for_test(&[
            ("backend.base_url", "https://safehome.example.com"),
            ("logging.level", "debug"),
            ("push.enabled", "false"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.backend.base_url, "https://safehome.example.com");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.push.enabled);
    }

    #[test]
    fn test_config_validation_missing_backend_url() {
        let config =
            Config::load_for_test(&[("backend.base_url", "")]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("SAFEHOME__BACKEND__BASE_URL"));
    }

    #[test]
    fn test_config_validation_missing_stream_url() {
        let config = Config::load_for_test(&[("stream.url", "")]).expect("Failed to load config");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_gateway_required_when_enabled() {
        let config = Config::load_for_test(&[("push.gateway_url", "")])
            .expect("Failed to load config");
        assert!(config.validate().is_err());

        let config = Config::load_for_test(&[
            ("push.gateway_url", ""),
            ("push.enabled", "false"),
        ])
        .expect("Failed to load config");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_permission() {
        let config = Config::load_for_test(&[("push.permission", "always")])
            .expect("Failed to load config");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_permission() {
        let config = Config::load_for_test(&[("push.permission", "granted")])
            .expect("Failed to load config");
        assert_eq!(config.initial_permission(), Permission::Granted);
    }

    #[test]
    fn test_default_device_name_mentions_client() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");
        assert!(config.push.device_name.starts_with("safehome-client/"));
    }
}
