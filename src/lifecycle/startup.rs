//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve configuration from file, environment and CLI flags
//! - Validate once, after every layer is applied
//! - Warn about risky but legal settings
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Environment access is injected so resolution stays testable

use std::path::PathBuf;

use crate::config::{apply_env_overrides, read_config, validate_config, ConfigError, ProxyConfig};

/// Settings given on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub upstream_url: Option<String>,
    pub log_level: Option<String>,
}

/// Build the final configuration: defaults, file, environment, flags.
pub fn resolve_config<F>(overrides: &ConfigOverrides, env: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &overrides.config_path {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, env);

    if let Some(bind) = &overrides.bind_address {
        config.listener.bind_address = crate::config::loader::normalize_bind_address(bind);
    }
    if let Some(url) = &overrides.upstream_url {
        config.upstream.base_url = url.clone();
    }
    if let Some(level) = &overrides.log_level {
        config.observability.log_level = level.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Log warnings for settings that work but are probably a mistake.
pub fn warn_on_risky_settings(config: &ProxyConfig) {
    if config.upstream.api_key.is_empty() {
        tracing::warn!("No API key configured; set EVOLUTION_API_KEY");
    } else if config.upstream.api_key == crate::config::UpstreamConfig::default().api_key {
        tracing::warn!("Using the placeholder API key; set EVOLUTION_API_KEY in real deployments");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::{ENV_API_KEY, ENV_UPSTREAM_URL};

    #[test]
    fn flags_beat_environment() {
        let overrides = ConfigOverrides {
            upstream_url: Some("http://flag:1".into()),
            bind_address: Some("5050".into()),
            ..Default::default()
        };
        let config = resolve_config(&overrides, |k| match k {
            ENV_UPSTREAM_URL => Some("http://env:1".into()),
            ENV_API_KEY => Some("from-env".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.upstream.base_url, "http://flag:1");
        assert_eq!(config.upstream.api_key, "from-env");
        assert_eq!(config.listener.bind_address, "0.0.0.0:5050");
    }

    #[test]
    fn invalid_final_config_is_rejected() {
        let overrides = ConfigOverrides {
            upstream_url: Some("not a url".into()),
            ..Default::default()
        };
        let err = resolve_config(&overrides, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn missing_config_file_is_fatal() {
        let overrides = ConfigOverrides {
            config_path: Some("/no/such/proxy.toml".into()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(&overrides, |_| None),
            Err(ConfigError::Io(_))
        ));
    }
}
