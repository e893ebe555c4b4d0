use std::{path::PathBuf, time::Duration};

use duration_str::deserialize_duration;
use serde::Deserialize;
use url::Url;

/// How to reach the Kubernetes API and which identity to report.
///
/// Client settings are resolved in order: an explicit `master_url` wins,
/// then the local kubeconfig (if `try_kubeconfig`), then the in-cluster
/// service account (if `try_service_account`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KubernetesConfig {
    /// Whether the Kubernetes contributor is registered.
    pub enabled: bool,
    /// API server URL. Skips kubeconfig and service account discovery.
    pub master_url: Option<Url>,
    /// Accept any certificate presented by the API server.
    pub trust_certs: bool,
    /// Read the client configuration from the local kubeconfig.
    pub try_kubeconfig: bool,
    /// Kubeconfig file to read instead of `KUBECONFIG` or `~/.kube/config`.
    pub kubeconfig: Option<PathBuf>,
    /// Read the client configuration from the mounted service account.
    pub try_service_account: bool,
    /// Namespace to report. Defaults to the namespace of the resolved client
    /// configuration.
    pub namespace: Option<String>,
    /// Name of the pod this instance runs in. Defaults to `HOSTNAME` when
    /// running inside a cluster.
    pub pod_name: Option<String>,
    /// Upper bound for a single metadata lookup.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_url: None,
            trust_certs: false,
            try_kubeconfig: true,
            kubeconfig: None,
            try_service_account: true,
            namespace: None,
            pod_name: None,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(3)
}
