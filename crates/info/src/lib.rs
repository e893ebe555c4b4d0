//! Info document aggregation.
//!
//! An info document is a JSON object assembled from independent
//! contributors. Each contributor owns one top level key; a contributor that
//! cannot produce its value is left out of the document instead of failing
//! the whole request.

mod aggregator;
mod build;
mod details;
mod error;
mod kubernetes;

use std::sync::Arc;

use async_trait::async_trait;
use config::Config;

pub use aggregator::{InfoAggregator, InfoPayload};
pub use build::BuildInfoContributor;
pub use details::StaticInfoContributor;
pub use error::{ClientError, NotAvailable};
pub use kubernetes::{ClusterIdentity, ClusterMetadataProvider};

/// Supplies one named slice of the info document.
#[async_trait]
pub trait InfoContributor: Send + Sync {
    /// Key under which the contribution appears in the document.
    fn key(&self) -> &str;

    /// Produce the value for [`InfoContributor::key`].
    async fn contribute(&self) -> Result<serde_json::Value, NotAvailable>;
}

/// Builds the contributors enabled in the configuration, in registration
/// order: static details, build information, Kubernetes metadata.
///
/// `name` and `version` identify the running binary in the build section.
pub async fn contributors(config: &Config, name: &str, version: &str) -> Vec<Arc<dyn InfoContributor>> {
    let mut contributors: Vec<Arc<dyn InfoContributor>> = Vec::new();

    for (key, value) in &config.info.details {
        contributors.push(Arc::new(StaticInfoContributor::new(key.clone(), value.clone())));
    }

    if config.info.build.enabled {
        contributors.push(Arc::new(BuildInfoContributor::new(name, version)));
    }

    if config.kubernetes.enabled {
        contributors.push(Arc::new(ClusterMetadataProvider::new(&config.kubernetes).await));
    }

    log::debug!(
        "Registered info contributors: {}",
        contributors.iter().map(|c| c.key()).collect::<Vec<_>>().join(", ")
    );

    contributors
}
