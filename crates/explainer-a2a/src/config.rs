//! # Environment-Based Configuration
//!
//! Server settings are read from environment variables and validated before
//! the router is built.
//!
//! ## Environment Variables
//!
//! - `EXPLAINER_BIND_ADDR` - Listen address (default: `0.0.0.0:4111`)
//! - `EXPLAINER_MAX_BODY_SIZE` - Maximum request body size in bytes (default: 1048576 / 1MB)
//! - `EXPLAINER_ENABLE_CORS` - Enable permissive CORS (default: true)

use std::env;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4111";

/// Default request body limit
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Largest accepted request body limit
pub const MAX_BODY_SIZE_LIMIT: usize = 16 * 1024 * 1024;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_addr: String,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Whether permissive CORS headers are sent
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            enable_cors: true,
        }
    }
}

/// Builder for [`ServerConfig`] with environment variable support
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::default();

        if let Some(addr) = get_env_string("EXPLAINER_BIND_ADDR") {
            builder = builder.bind_addr(addr);
        }
        if let Some(size) = get_env_usize("EXPLAINER_MAX_BODY_SIZE")? {
            builder = builder.max_body_size(size);
        }
        if let Some(cors) = get_env_bool("EXPLAINER_ENABLE_CORS")? {
            builder = builder.enable_cors(cors);
        }

        Ok(builder)
    }

    /// Set the listen address
    #[must_use]
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    /// Set maximum request body size in bytes
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Enable or disable CORS
    #[must_use]
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.config.enable_cors = enable;
        self
    }

    /// Validate configuration and build `ServerConfig`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.validate()?;
        Ok(self.config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.config.bind_addr.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "bind_addr cannot be empty".to_string(),
            ));
        }
        if self.config.max_body_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_body_size must be greater than 0".to_string(),
            ));
        }
        if self.config.max_body_size > MAX_BODY_SIZE_LIMIT {
            return Err(ConfigError::ValidationError(
                "max_body_size must be <= 16MB".to_string(),
            ));
        }

        Ok(())
    }
}

// Environment variable helper functions

/// Read a variable, `None` when unset
pub fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Read a boolean variable (true/false/1/0/yes/no/on/off)
pub fn get_env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(val) => parse_bool(key, &val).map(Some),
        Err(_) => Ok(None),
    }
}

/// Read an unsigned size variable
pub fn get_env_usize(key: &str) -> Result<Option<usize>, ConfigError> {
    match env::var(key) {
        Ok(val) => val
            .parse::<usize>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid usize value '{val}': {e}"),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(key: &str, val: &str) -> Result<bool, ConfigError> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            message: format!("invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"),
        }),
    }
}
