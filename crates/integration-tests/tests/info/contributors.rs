use indoc::{formatdoc, indoc};
use integration_tests::{KubernetesMock, TestServer, unreachable_master_url};
use serde_json::json;

#[tokio::test]
async fn no_contributors() {
    let config = indoc! {r#"
        [info.build]
        enabled = false

        [kubernetes]
        enabled = false
    "#};

    let server = TestServer::builder().build(config).await;
    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    insta::assert_snapshot!(body, @"{}");
}

#[tokio::test]
async fn content_type() {
    let config = indoc! {r#"
        [kubernetes]
        enabled = false
    "#};

    let server = TestServer::builder().build(config).await;
    let response = server.client.get("/info").await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");
}

#[tokio::test]
async fn build_information() {
    let config = indoc! {r#"
        [kubernetes]
        enabled = false
    "#};

    let server = TestServer::builder().build(config).await;
    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    insta::assert_snapshot!(body, @r#"{"build":{"name":"kubeinfo","version":"0.1.0"}}"#);
}

#[tokio::test]
async fn static_details() {
    let config = indoc! {r#"
        [info.build]
        enabled = false

        [info.details]
        team = "platform"
        app = { name = "demo", tier = "backend" }

        [kubernetes]
        enabled = false
    "#};

    let server = TestServer::builder().build(config).await;
    let body = server.info_json().await;

    assert_eq!(
        body,
        json!({
            "team": "platform",
            "app": { "name": "demo", "tier": "backend" }
        })
    );
}

#[tokio::test]
async fn details_keep_declaration_order() {
    let config = indoc! {r#"
        [info.build]
        enabled = false

        [info.details]
        zeta = 1
        alpha = 2
        app = { tier = "backend", name = "demo" }

        [kubernetes]
        enabled = false
    "#};

    let server = TestServer::builder().build(config).await;
    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    insta::assert_snapshot!(body, @r#"{"zeta":1,"alpha":2,"app":{"tier":"backend","name":"demo"}}"#);
}

#[tokio::test]
async fn contributors_keep_registration_order() {
    let api = KubernetesMock::start().await;

    let config = formatdoc! {r#"
        [info.details]
        team = "platform"

        {kubernetes}
    "#, kubernetes = api.config("test")};

    let server = TestServer::builder().build(&config).await;
    let (status, body) = server.info().await;

    assert_eq!(status, 200);

    let team = body.find("\"team\"").unwrap();
    let build = body.find("\"build\"").unwrap();
    let kubernetes = body.find("\"kubernetes\"").unwrap();

    assert!(team < build && build < kubernetes, "{body}");
}

#[tokio::test]
async fn unavailable_kubernetes_is_left_out() {
    let config = formatdoc! {r#"
        [info.build]
        enabled = false

        [info.details]
        team = "platform"

        {kubernetes}
    "#, kubernetes = unreachable_master_url("test")};

    let server = TestServer::builder().build(&config).await;
    let (status, body) = server.info().await;

    assert_eq!(status, 200);
    insta::assert_snapshot!(body, @r#"{"team":"platform"}"#);
}

#[tokio::test]
async fn custom_path() {
    let config = indoc! {r#"
        [info]
        path = "/actuator/info"

        [info.build]
        enabled = false

        [info.details]
        team = "platform"

        [kubernetes]
        enabled = false
    "#};

    let server = TestServer::builder().build(config).await;

    let (status, body) = server.client.info("/actuator/info").await;
    assert_eq!(status, 200);
    insta::assert_snapshot!(body, @r#"{"team":"platform"}"#);

    let (status, _) = server.client.info("/info").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn info_disabled() {
    let config = indoc! {r#"
        [info]
        enabled = false

        [kubernetes]
        enabled = false
    "#};

    let server = TestServer::builder().build(config).await;
    let (status, _) = server.client.info("/info").await;

    assert_eq!(status, 404);
}
