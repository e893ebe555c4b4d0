//! The info endpoint.

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use http::header::CONTENT_TYPE;
use info::InfoAggregator;

/// Serves the aggregated info document as JSON.
#[derive(Clone)]
pub struct InfoEndpoint {
    aggregator: InfoAggregator,
}

impl InfoEndpoint {
    pub fn new(aggregator: InfoAggregator) -> Self {
        Self { aggregator }
    }

    /// Collects and encodes the document. Unavailable contributors are
    /// already absorbed by the aggregator, so only encoding can fail.
    pub async fn render(&self) -> crate::Result<Vec<u8>> {
        let payload = self.aggregator.collect().await;
        Ok(serde_json::to_vec(&payload)?)
    }

    pub(crate) fn router(self, path: &str) -> Router {
        Router::new().route(path, get(handle)).with_state(self)
    }
}

async fn handle(State(endpoint): State<InfoEndpoint>) -> crate::Result<Response> {
    log::debug!("Serving info request");

    let body = endpoint.render().await?;
    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}
