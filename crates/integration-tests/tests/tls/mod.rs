use indoc::formatdoc;
use integration_tests::{KubernetesMock, TestServer, get_test_cert_paths};

#[tokio::test]
async fn info_over_tls() {
    let api = KubernetesMock::start().await;
    let (certificate, key) = get_test_cert_paths();

    let config = formatdoc! {r#"
        [server.tls]
        certificate = "{certificate}"
        key = "{key}"

        {kubernetes}
    "#,
        certificate = certificate.display(),
        key = key.display(),
        kubernetes = api.config("test"),
    };

    let server = TestServer::builder().build(&config).await;

    assert!(server.client.base_url().starts_with("https://"));

    let body = server.info_json().await;
    assert_eq!(body["kubernetes"]["namespace"], "test");
}

#[tokio::test]
async fn plain_http_is_rejected_by_tls_listener() {
    let (certificate, key) = get_test_cert_paths();

    let config = formatdoc! {r#"
        [server.tls]
        certificate = "{certificate}"
        key = "{key}"

        [kubernetes]
        enabled = false
    "#,
        certificate = certificate.display(),
        key = key.display(),
    };

    let server = TestServer::builder().build(&config).await;

    let result = reqwest::get(format!("http://{}/info", server.address)).await;
    assert!(result.is_err() || !result.unwrap().status().is_success());
}
