//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Upstream base URL.
pub const ENV_UPSTREAM_URL: &str = "EVOLUTION_API_URL";
/// Listen port or address (`:3030`, `3030`, `0.0.0.0:3030`).
pub const ENV_LISTEN_PORT: &str = "API_PORT";
/// Credential injected into every upstream request.
pub const ENV_API_KEY: &str = "EVOLUTION_API_KEY";
/// Log level.
pub const ENV_LOG_LEVEL: &str = "PROXY_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed:")?;
                for err in errors {
                    write!(f, "\n  - {}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a configuration from a TOML file without validating it.
///
/// Validation is deferred so that environment and CLI overrides can fix
/// fields before the final check.
pub fn read_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay environment variables onto a configuration.
///
/// `lookup` is usually `|k| std::env::var(k).ok()`; tests pass a map.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_UPSTREAM_URL) {
        config.upstream.base_url = url;
    }
    if let Some(port) = lookup(ENV_LISTEN_PORT) {
        config.listener.bind_address = normalize_bind_address(&port);
    }
    if let Some(key) = lookup(ENV_API_KEY) {
        config.upstream.api_key = key;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }
}

/// Turn a bare port (`3030`) or a port-only address (`:3030`) into a full
/// bind address on all interfaces. Anything else is returned unchanged.
pub fn normalize_bind_address(value: &str) -> String {
    let value = value.trim();
    if let Some(port) = value.strip_prefix(':') {
        return format!("0.0.0.0:{}", port);
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return format!("0.0.0.0:{}", value);
    }
    value.to_string()
}
