//! Kubernetes metadata of the running instance.

use std::time::Duration;

use async_trait::async_trait;
use config::KubernetesConfig;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, Client,
    config::{KubeConfigOptions, Kubeconfig},
};
use serde::Serialize;

use crate::{ClientError, InfoContributor, NotAvailable};

/// Set by the kubelet in every container of a pod.
const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
/// Defaults to the pod name inside a cluster.
const HOSTNAME_ENV: &str = "HOSTNAME";

/// Where the instance runs, as seen by the Kubernetes API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIdentity {
    pub namespace: String,
    /// Whether the pod of this instance was found through the API.
    pub inside: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
}

impl ClusterIdentity {
    fn outside(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            inside: false,
            pod_name: None,
            pod_ip: None,
            host_ip: None,
            node_name: None,
            service_account: None,
        }
    }

    fn from_pod(namespace: &str, pod: Pod) -> Self {
        let spec = pod.spec.unwrap_or_default();
        let status = pod.status.unwrap_or_default();

        Self {
            namespace: pod.metadata.namespace.unwrap_or_else(|| namespace.to_string()),
            inside: true,
            pod_name: pod.metadata.name,
            pod_ip: status.pod_ip,
            host_ip: status.host_ip,
            node_name: spec.node_name,
            service_account: spec.service_account_name,
        }
    }
}

/// Reads namespace and pod identity from the Kubernetes API.
///
/// Every call goes to the API; nothing is cached between calls. The client
/// is built once and shared, which only shares its connection pool.
pub struct ClusterMetadataProvider {
    client: Result<Client, String>,
    namespace: String,
    pod_name: Option<String>,
    timeout: Duration,
}

impl ClusterMetadataProvider {
    /// Builds the provider from an immutable configuration.
    ///
    /// A client that cannot be built is not an error here: the provider is
    /// still returned and reports [`NotAvailable`] on every fetch.
    pub async fn new(config: &KubernetesConfig) -> Self {
        Self::with_pod_name_lookup(config, pod_name_from_environment).await
    }

    /// Like [`ClusterMetadataProvider::new`], resolving an unconfigured pod
    /// name through `lookup` instead of the process environment.
    async fn with_pod_name_lookup(config: &KubernetesConfig, lookup: impl FnOnce() -> Option<String>) -> Self {
        let pod_name = config.pod_name.clone().or_else(lookup);

        match client_config(config).await {
            Ok(client_config) => {
                let namespace = config
                    .namespace
                    .clone()
                    .unwrap_or_else(|| client_config.default_namespace.clone());

                let client = Client::try_from(client_config).map_err(|err| {
                    let err = ClientError::from(err);
                    log::warn!("Kubernetes metadata will not be available: {err}");
                    err.to_string()
                });

                if client.is_ok() {
                    log::info!("Reporting Kubernetes metadata for namespace '{namespace}'");
                }

                Self {
                    client,
                    namespace,
                    pod_name,
                    timeout: config.timeout,
                }
            }
            Err(err) => {
                log::warn!("Kubernetes metadata will not be available: {err}");

                Self {
                    client: Err(err.to_string()),
                    namespace: config.namespace.clone().unwrap_or_default(),
                    pod_name,
                    timeout: config.timeout,
                }
            }
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn pod_name(&self) -> Option<&str> {
        self.pod_name.as_deref()
    }

    /// Resolves the current identity, bounded by the configured timeout.
    pub async fn fetch(&self) -> Result<ClusterIdentity, NotAvailable> {
        match tokio::time::timeout(self.timeout, self.read_identity()).await {
            Ok(result) => result,
            Err(_) => Err(NotAvailable::Timeout(self.timeout)),
        }
    }

    async fn read_identity(&self) -> Result<ClusterIdentity, NotAvailable> {
        let client = self
            .client
            .as_ref()
            .map_err(|reason| NotAvailable::NoClient(reason.clone()))?
            .clone();

        if self.namespace.is_empty() {
            return Err(NotAvailable::MissingField("namespace"));
        }

        let version = client.apiserver_version().await?;
        log::debug!("Kubernetes API answered with version {}", version.git_version);

        let Some(pod_name) = &self.pod_name else {
            return Ok(ClusterIdentity::outside(&self.namespace));
        };

        let pods: Api<Pod> = Api::namespaced(client, &self.namespace);

        match pods.get_opt(pod_name).await? {
            Some(pod) => Ok(ClusterIdentity::from_pod(&self.namespace, pod)),
            None => {
                log::debug!("Pod '{pod_name}' not found in namespace '{}'", self.namespace);
                Ok(ClusterIdentity::outside(&self.namespace))
            }
        }
    }
}

#[async_trait]
impl InfoContributor for ClusterMetadataProvider {
    fn key(&self) -> &str {
        "kubernetes"
    }

    async fn contribute(&self) -> Result<serde_json::Value, NotAvailable> {
        let identity = self.fetch().await?;
        Ok(serde_json::to_value(identity)?)
    }
}

async fn client_config(config: &KubernetesConfig) -> Result<kube::Config, ClientError> {
    let mut client_config = if let Some(master_url) = &config.master_url {
        kube::Config::new(master_url.as_str().parse()?)
    } else if let Some(client_config) = kubeconfig(config).await? {
        client_config
    } else if config.try_service_account {
        kube::Config::incluster()?
    } else {
        return Err(ClientError::NoSource);
    };

    if config.trust_certs {
        client_config.accept_invalid_certs = true;
    }

    client_config.connect_timeout = Some(config.timeout);
    client_config.read_timeout = Some(config.timeout);

    Ok(client_config)
}

/// A missing default kubeconfig falls through to the service account when
/// that is enabled. An explicit `kubeconfig` file must be readable.
async fn kubeconfig(config: &KubernetesConfig) -> Result<Option<kube::Config>, ClientError> {
    if !config.try_kubeconfig {
        return Ok(None);
    }

    let options = KubeConfigOptions::default();

    let result = match &config.kubeconfig {
        Some(path) => match Kubeconfig::read_from(path) {
            Ok(kubeconfig) => kube::Config::from_custom_kubeconfig(kubeconfig, &options).await,
            Err(err) => Err(err),
        },
        None => kube::Config::from_kubeconfig(&options).await,
    };

    match result {
        Ok(client_config) => Ok(Some(client_config)),
        Err(err) if config.kubeconfig.is_none() && config.try_service_account => {
            log::debug!("No usable kubeconfig: {err}");
            Ok(None)
        }
        Err(err) => Err(ClientError::Kubeconfig(err)),
    }
}

fn pod_name_from_environment() -> Option<String> {
    std::env::var_os(SERVICE_HOST_ENV)?;

    std::env::var(HOSTNAME_ENV).ok().filter(|name| !name.is_empty())
}
