//! A stand-in for the Kubernetes API, backed by wiremock.

use std::time::Duration;

use indoc::formatdoc;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, path_regex},
};

/// A running mock of the Kubernetes API surface the info endpoint reads.
pub struct KubernetesMock {
    server: MockServer,
}

impl KubernetesMock {
    /// A healthy API server answering `/version`. Pods that were not added
    /// with [`KubernetesMock::with_pod`] are reported as not found.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        mount_version(&server, ResponseTemplate::new(200).set_body_json(version())).await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/api/v1/namespaces/[^/]+/pods/[^/]+$"))
            .respond_with(not_found("pod"))
            .with_priority(10)
            .mount(&server)
            .await;

        Self { server }
    }

    /// An API server whose `/version` answers with the given status.
    pub async fn failing(status: u16) -> Self {
        let server = MockServer::start().await;
        mount_version(&server, ResponseTemplate::new(status)).await;

        Self { server }
    }

    /// An API server that answers `/version` only after `delay`.
    pub async fn slow(delay: Duration) -> Self {
        let server = MockServer::start().await;

        mount_version(
            &server,
            ResponseTemplate::new(200).set_body_json(version()).set_delay(delay),
        )
        .await;

        Self { server }
    }

    /// Serve a pod manifest at its namespaced path.
    pub async fn with_pod(self, pod: serde_json::Value) -> Self {
        let namespace = pod["metadata"]["namespace"].as_str().unwrap_or("default").to_string();
        let name = pod["metadata"]["name"].as_str().unwrap_or_default().to_string();

        Mock::given(method("GET"))
            .and(path(format!("/api/v1/namespaces/{namespace}/pods/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(pod))
            .mount(&self.server)
            .await;

        self
    }

    /// Answer lookups of the named pod with a `NotFound` status.
    pub async fn without_pod(self, namespace: &str, name: &str) -> Self {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/namespaces/{namespace}/pods/{name}")))
            .respond_with(not_found(name))
            .mount(&self.server)
            .await;

        self
    }

    /// Get the server's URI (e.g., "http://127.0.0.1:12345").
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// A `[kubernetes]` table pointing at this mock. More keys of the table
    /// can be appended right after it.
    pub fn config(&self, namespace: &str) -> String {
        kubernetes_config(&self.uri(), namespace)
    }

    /// HTTP methods of every request received so far.
    pub async fn received_methods(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.method.to_string())
            .collect()
    }
}

/// A `[kubernetes]` table pointing at an address nothing listens on.
pub fn unreachable_master_url(namespace: &str) -> String {
    let address = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .unwrap();

    kubernetes_config(&format!("http://{address}"), namespace)
}

/// A minimal scheduled pod.
pub fn pod_manifest(namespace: &str, name: &str) -> serde_json::Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "labels": { "app": "demo" }
        },
        "spec": {
            "containers": [{ "name": "demo", "image": "demo:latest" }],
            "nodeName": "node-1",
            "serviceAccountName": "demo-sa"
        },
        "status": {
            "phase": "Running",
            "podIP": "10.1.2.3",
            "hostIP": "192.168.0.10"
        }
    })
}

fn kubernetes_config(master_url: &str, namespace: &str) -> String {
    formatdoc! {r#"
        [kubernetes]
        master_url = "{master_url}"
        trust_certs = true
        try_kubeconfig = false
        try_service_account = false
        namespace = "{namespace}"
    "#, master_url = master_url, namespace = namespace}
}

fn not_found(name: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": format!("pods \"{name}\" not found"),
        "reason": "NotFound",
        "details": { "name": name, "kind": "pods" },
        "code": 404
    }))
}

fn version() -> serde_json::Value {
    json!({
        "major": "1",
        "minor": "31",
        "gitVersion": "v1.31.0",
        "gitCommit": "fake",
        "gitTreeState": "clean",
        "buildDate": "2024-01-01T00:00:00Z",
        "goVersion": "go1.22.0",
        "compiler": "gc",
        "platform": "linux/amd64"
    })
}

async fn mount_version(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(response)
        .mount(server)
        .await;
}
