use indexmap::IndexMap;
use serde::Deserialize;

/// Configuration of the info endpoint and the contributors feeding it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InfoConfig {
    /// Whether the info endpoint is served at all.
    pub enabled: bool,
    /// The path the info endpoint is served from.
    pub path: String,
    /// Build information contributor.
    pub build: BuildInfoConfig,
    /// Free-form entries copied into the payload as is. Each top level key
    /// becomes one entry of the info document.
    pub details: IndexMap<String, serde_json::Value>,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/info".to_string(),
            build: BuildInfoConfig::default(),
            details: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildInfoConfig {
    pub enabled: bool,
}

impl Default for BuildInfoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
