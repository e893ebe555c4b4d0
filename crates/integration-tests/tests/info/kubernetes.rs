use std::time::{Duration, Instant};

use indoc::{formatdoc, indoc};
use integration_tests::{KubernetesMock, TestServer, pod_manifest, unreachable_master_url};
use serde_json::json;

#[tokio::test]
async fn info_endpoint_contains_kubernetes() {
    let api = KubernetesMock::start().await;
    let server = TestServer::builder().build(&api.config("test")).await;

    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    assert!(body.contains("kubernetes"), "{body}");
    assert!(body.contains("test"), "{body}");
}

#[tokio::test]
async fn namespace_outside_of_a_pod() {
    let api = KubernetesMock::start().await;
    let server = TestServer::builder().build(&api.config("test")).await;

    let body = server.info_json().await;

    assert_eq!(body["kubernetes"], json!({ "namespace": "test", "inside": false }));
}

#[tokio::test]
async fn pod_details() {
    let api = KubernetesMock::start()
        .await
        .with_pod(pod_manifest("test", "demo-7d9f"))
        .await;

    let config = formatdoc! {r#"
        {kubernetes}
        pod_name = "demo-7d9f"
    "#, kubernetes = api.config("test")};

    let server = TestServer::builder().build(&config).await;
    let body = server.info_json().await;

    assert_eq!(
        body["kubernetes"],
        json!({
            "namespace": "test",
            "inside": true,
            "podName": "demo-7d9f",
            "podIp": "10.1.2.3",
            "hostIp": "192.168.0.10",
            "nodeName": "node-1",
            "serviceAccount": "demo-sa"
        })
    );
}

#[tokio::test]
async fn pod_not_found() {
    let api = KubernetesMock::start().await.without_pod("test", "gone").await;

    let config = formatdoc! {r#"
        {kubernetes}
        pod_name = "gone"
    "#, kubernetes = api.config("test")};

    let server = TestServer::builder().build(&config).await;
    let body = server.info_json().await;

    assert_eq!(body["kubernetes"], json!({ "namespace": "test", "inside": false }));
}

#[tokio::test]
async fn api_unreachable() {
    let server = TestServer::builder().build(&unreachable_master_url("test")).await;

    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    assert!(!body.contains("kubernetes"), "{body}");
}

#[tokio::test]
async fn api_error_status() {
    let api = KubernetesMock::failing(500).await;
    let server = TestServer::builder().build(&api.config("test")).await;

    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    assert!(!body.contains("kubernetes"), "{body}");
}

#[tokio::test]
async fn api_slower_than_timeout() {
    let api = KubernetesMock::slow(Duration::from_secs(10)).await;

    let config = formatdoc! {r#"
        {kubernetes}
        timeout = "300ms"
    "#, kubernetes = api.config("test")};

    let server = TestServer::builder().build(&config).await;

    let started = Instant::now();
    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    assert!(!body.contains("kubernetes"), "{body}");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn no_kubernetes_client() {
    let config = indoc! {r#"
        [info.build]
        enabled = false

        [kubernetes]
        try_kubeconfig = false
        try_service_account = false
        namespace = "test"
    "#};

    let server = TestServer::builder().build(config).await;
    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    insta::assert_snapshot!(body, @"{}");
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let api = KubernetesMock::start()
        .await
        .with_pod(pod_manifest("test", "demo-7d9f"))
        .await;

    let config = formatdoc! {r#"
        {kubernetes}
        pod_name = "demo-7d9f"
    "#, kubernetes = api.config("test")};

    let server = TestServer::builder().build(&config).await;

    let (_, first) = server.info().await;
    let (_, second) = server.info().await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn only_reads_from_the_api() {
    let api = KubernetesMock::start()
        .await
        .with_pod(pod_manifest("test", "demo-7d9f"))
        .await;

    let config = formatdoc! {r#"
        {kubernetes}
        pod_name = "demo-7d9f"
    "#, kubernetes = api.config("test")};

    let server = TestServer::builder().build(&config).await;

    server.info().await;
    server.info().await;

    let methods = api.received_methods().await;

    assert!(!methods.is_empty());
    assert!(methods.iter().all(|method| method == "GET"), "{methods:?}");
}

#[tokio::test]
async fn every_request_reaches_the_api() {
    let api = KubernetesMock::start().await;
    let server = TestServer::builder().build(&api.config("test")).await;

    server.info().await;
    let after_first = api.received_methods().await.len();

    server.info().await;
    let after_second = api.received_methods().await.len();

    assert!(after_second > after_first);
}
