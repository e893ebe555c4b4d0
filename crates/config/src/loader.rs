use std::{path::Path, time::Duration};

use crate::{Config, error::Error};

pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse(&content)
}

pub(crate) fn parse(content: &str) -> crate::Result<Config> {
    let config: Config = toml::from_str(content)?;

    validate_paths(&config)?;
    validate_kubernetes(&config)?;
    validate_details(&config)?;

    if !config.info.enabled {
        log::warn!("The info endpoint is disabled, only the health endpoint will be served");
    }

    Ok(config)
}

pub(crate) fn validate_paths(config: &Config) -> crate::Result<()> {
    let health = &config.server.health;
    let info = &config.info;

    if health.enabled && !health.path.starts_with('/') {
        return Err(Error::Invalid(format!(
            "Health endpoint path must start with '/', got '{}'",
            health.path
        )));
    }

    if info.enabled && !info.path.starts_with('/') {
        return Err(Error::Invalid(format!(
            "Info endpoint path must start with '/', got '{}'",
            info.path
        )));
    }

    if health.enabled && info.enabled && health.path == info.path {
        return Err(Error::Invalid(format!(
            "Duplicate endpoint path: health and info endpoints cannot use the same path ({})",
            info.path
        )));
    }

    Ok(())
}

pub(crate) fn validate_kubernetes(config: &Config) -> crate::Result<()> {
    let kubernetes = &config.kubernetes;

    if !kubernetes.enabled {
        return Ok(());
    }

    if kubernetes.timeout == Duration::ZERO {
        return Err(Error::Invalid("kubernetes.timeout must be greater than zero".to_string()));
    }

    if let Some(namespace) = &kubernetes.namespace
        && namespace.trim().is_empty()
    {
        return Err(Error::Invalid("kubernetes.namespace must not be empty".to_string()));
    }

    Ok(())
}

/// Static details must not shadow the key of an enabled contributor: when
/// that contributor fails, its key has to be absent from the document.
pub(crate) fn validate_details(config: &Config) -> crate::Result<()> {
    let reserved = [
        ("build", config.info.build.enabled, "[info.build]"),
        ("kubernetes", config.kubernetes.enabled, "[kubernetes]"),
    ];

    for (key, enabled, section) in reserved {
        if enabled && config.info.details.contains_key(key) {
            return Err(Error::Invalid(format!(
                "info.details.{key} is reserved while {section} is enabled"
            )));
        }
    }

    Ok(())
}
