mod kubernetes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use config::Config;
use server::ServeConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use kubernetes::{KubernetesMock, pod_manifest, unreachable_master_url};

pub fn get_test_cert_paths() -> (PathBuf, PathBuf) {
    let cert_path = PathBuf::from("test-certs/cert.pem");
    let key_path = PathBuf::from("test-certs/key.pem");

    (cert_path, key_path)
}

static INIT: Once = Once::new();

#[ctor::ctor]
fn init_crypto_provider() {
    INIT.call_once(|| {
        rustls::crypto::aws_lc_rs::default_provider()
            .install_default()
            .expect("Failed to install default crypto provider");
    });
}

/// Test client for making HTTP requests to the test server
#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    /// Create a new test client for the given base URL
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new test client that accepts invalid TLS certificates
    pub fn new_with_tls(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to create client with invalid cert acceptance");

        Self { base_url, client }
    }

    /// Send a GET request to the given path
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    /// Send a GET request to the given path, returning Result instead of panicking
    pub async fn try_get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(format!("{}{}", self.base_url, path)).send().await
    }

    /// Fetch the info document and return status and raw body
    pub async fn info(&self, path: &str) -> (u16, String) {
        let response = self.get(path).await;
        let status = response.status().as_u16();

        (status, response.text().await.unwrap())
    }

    /// Get the base URL of this test client
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

pub struct TestServer {
    pub client: TestClient,
    pub address: SocketAddr,
    /// Configuration used by this test server
    pub config: Config,
    /// Handle to the server task
    _task_handle: tokio::task::JoinHandle<()>,
    /// Shutdown signal for the server
    shutdown_signal: CancellationToken,
}

impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder::default()
    }

    /// Start a new test server with the given TOML configuration
    async fn start(config_toml: &str, log_filter: &str) -> Self {
        // Write config to a temporary file and use the proper loader to ensure validation
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, config_toml).unwrap();

        let config = Config::load(&config_path).unwrap();

        // Find an available port
        let mut listener = TcpListener::bind("127.0.0.1:0").await;

        #[allow(clippy::panic)]
        while let Err(e) = listener {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                listener = TcpListener::bind("127.0.0.1:0").await;
            } else {
                panic!("Failed to bind to address: {e}");
            }
        }

        let listener = listener.unwrap();
        let address = listener.local_addr().unwrap();

        let has_tls = config.server.tls.is_some();

        let shutdown_signal = CancellationToken::new();

        let serve_config = ServeConfig {
            listen_address: address,
            config: config.clone(),
            shutdown_signal: shutdown_signal.clone(),
            log_filter: log_filter.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        // Start the server in a background task
        let (tx, mut rx) = tokio::sync::oneshot::channel();
        let task_handle = tokio::spawn(async move {
            // Drop the listener so the server can bind to the address
            drop(listener);

            let _ = tx.send(server::serve(serve_config).await);
        });

        // Create the test client - use HTTPS if TLS is configured
        let protocol = if has_tls { "https" } else { "http" };
        let base_url = format!("{protocol}://{address}");

        let client = if has_tls {
            TestClient::new_with_tls(base_url)
        } else {
            TestClient::new(base_url)
        };

        // Verify the server is actually running; any HTTP answer will do
        let mut retries = 30;
        let mut last_error = None;

        while retries > 0 {
            #[allow(clippy::panic)]
            if let Ok(Err(e)) = rx.try_recv() {
                panic!("Server failed to start: {e}");
            }

            match client.try_get("/health").await {
                Ok(_) => break,
                Err(e) => {
                    last_error = Some(e);
                }
            }

            retries -= 1;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        if retries == 0 {
            #[allow(clippy::panic)]
            if let Some(e) = last_error {
                panic!("Server failed to become ready after 30 retries. Last error: {e}");
            } else {
                panic!("Server failed to become ready after 30 retries. No specific error.");
            }
        }

        TestServer {
            client,
            address,
            config,
            _task_handle: task_handle,
            shutdown_signal,
        }
    }

    /// Fetch the configured info endpoint
    pub async fn info(&self) -> (u16, String) {
        self.client.info(&self.config.info.path).await
    }

    /// Fetch the configured info endpoint and parse the body
    pub async fn info_json(&self) -> serde_json::Value {
        let (status, body) = self.info().await;
        assert_eq!(status, 200, "unexpected status, body: {body}");

        serde_json::from_str(&body).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown_signal.cancel();
    }
}

pub struct TestServerBuilder {
    log_filter: String,
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self {
            log_filter: "server=debug,info=debug,config=debug,integration_tests=debug".to_string(),
        }
    }
}

impl TestServerBuilder {
    /// Start the server with the given TOML configuration
    pub async fn build(self, config: &str) -> TestServer {
        TestServer::start(config, &self.log_filter).await
    }
}
