use async_trait::async_trait;
use serde::Serialize;

use crate::{InfoContributor, NotAvailable};

#[derive(Debug, Clone, Serialize)]
struct BuildInfo {
    name: String,
    version: String,
}

/// Contributes `"build"`: name and version of the running binary.
pub struct BuildInfoContributor {
    info: BuildInfo,
}

impl BuildInfoContributor {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            info: BuildInfo {
                name: name.to_string(),
                version: version.to_string(),
            },
        }
    }
}

#[async_trait]
impl InfoContributor for BuildInfoContributor {
    fn key(&self) -> &str {
        "build"
    }

    async fn contribute(&self) -> Result<serde_json::Value, NotAvailable> {
        Ok(serde_json::to_value(&self.info)?)
    }
}
