use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;

use crate::InfoContributor;

/// The info document: contribution key to contributed value.
///
/// Keys keep the position of their first insertion, so serializing the same
/// contributions twice yields identical bytes.
pub type InfoPayload = IndexMap<String, serde_json::Value>;

/// Composes the output of an ordered list of contributors.
#[derive(Clone, Default)]
pub struct InfoAggregator {
    contributors: Arc<[Arc<dyn InfoContributor>]>,
}

impl InfoAggregator {
    pub fn new(contributors: Vec<Arc<dyn InfoContributor>>) -> Self {
        Self {
            contributors: contributors.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    /// Runs every contributor and merges the successful ones.
    ///
    /// Contributors run concurrently but are merged in registration order.
    /// When two contributors use the same key the later one wins; the key
    /// stays where it was first inserted. Unavailable contributors are
    /// omitted, so this never fails.
    pub async fn collect(&self) -> InfoPayload {
        let results = join_all(self.contributors.iter().map(|contributor| contributor.contribute())).await;

        let mut payload = InfoPayload::with_capacity(self.contributors.len());

        for (contributor, result) in self.contributors.iter().zip(results) {
            let key = contributor.key();

            match result {
                Ok(value) => {
                    if payload.insert(key.to_string(), value).is_some() {
                        log::debug!("Info key '{key}' overwritten by a later contributor");
                    }
                }
                Err(err) => {
                    log::warn!("Info contributor '{key}' is not available: {err}");
                }
            }
        }

        payload
    }
}
