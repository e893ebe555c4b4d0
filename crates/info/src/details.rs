use async_trait::async_trait;

use crate::{InfoContributor, NotAvailable};

/// Contributes a fixed value taken from the `[info.details]` table.
pub struct StaticInfoContributor {
    key: String,
    value: serde_json::Value,
}

impl StaticInfoContributor {
    pub fn new(key: String, value: serde_json::Value) -> Self {
        Self { key, value }
    }
}

#[async_trait]
impl InfoContributor for StaticInfoContributor {
    fn key(&self) -> &str {
        &self.key
    }

    async fn contribute(&self) -> Result<serde_json::Value, NotAvailable> {
        Ok(self.value.clone())
    }
}
