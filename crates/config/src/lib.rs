mod error;
mod info;
mod kubernetes;
mod loader;
mod server;

use std::path::Path;

use serde::Deserialize;

pub use error::Error;
pub use info::{BuildInfoConfig, InfoConfig};
pub use kubernetes::KubernetesConfig;
pub use server::{HealthConfig, ServerConfig, TlsServerConfig};

pub type Result<T> = std::result::Result<T, error::Error>;

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub info: InfoConfig,
    #[serde(default)]
    pub kubernetes: KubernetesConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
        loader::load(path)
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(content: &str) -> crate::Result<Self> {
        loader::parse(content)
    }
}
