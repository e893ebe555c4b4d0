use std::time::Duration;

/// A contributor could not supply its part of the info document.
///
/// These never reach the HTTP caller: the aggregator drops the key and logs
/// the reason.
#[derive(Debug, thiserror::Error)]
pub enum NotAvailable {
    #[error("no Kubernetes client: {0}")]
    NoClient(String),

    #[error("Kubernetes API request failed: {0}")]
    Api(#[from] kube::Error),

    #[error("Kubernetes API did not answer within {0:?}")]
    Timeout(Duration),

    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("failed to encode contribution: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures while building a Kubernetes client at startup.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid master URL: {0}")]
    InvalidMasterUrl(#[from] http::uri::InvalidUri),

    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("failed to load in-cluster configuration: {0}")]
    InCluster(#[from] kube::config::InClusterError),

    #[error("failed to create client: {0}")]
    Client(#[from] kube::Error),

    #[error("no client configuration source is enabled")]
    NoSource,
}
