mod endpoint;
mod error;
mod health;
pub mod logger;

use std::{net::SocketAddr, time::Duration};

use axum::{Router, routing::get};
use axum_server::tls_rustls::RustlsConfig;
use config::Config;
use info::InfoAggregator;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use endpoint::InfoEndpoint;
pub use error::Error;

pub type Result<T> = std::result::Result<T, error::Error>;

/// Name reported in the build section of the info document.
pub const NAME: &str = "kubeinfo";

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct ServeConfig {
    pub listen_address: SocketAddr,
    pub config: Config,
    /// Cancelled to stop the server gracefully.
    pub shutdown_signal: CancellationToken,
    /// Filter passed to the logger, e.g. "info" or "server=debug,info=debug".
    pub log_filter: String,
    /// Version reported in the build section of the info document.
    pub version: String,
}

pub async fn serve(
    ServeConfig {
        listen_address,
        config,
        shutdown_signal,
        log_filter,
        version,
    }: ServeConfig,
) -> crate::Result<()> {
    logger::init(&log_filter);

    // Both the Kubernetes client and the TLS listener link rustls, so the
    // process-wide provider must be chosen before either is built.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let contributors = info::contributors(&config, NAME, &version).await;
    let app = router(&config, InfoAggregator::new(contributors));

    let listener = TcpListener::bind(listen_address).await.map_err(Error::Bind)?;
    let local_address = listener.local_addr().map_err(Error::Bind)?;

    match &config.server.tls {
        Some(tls_config) => {
            let rustls_config = RustlsConfig::from_pem_file(&tls_config.certificate, &tls_config.key)
                .await
                .map_err(|e| Error::Tls(e.to_string()))?;

            log_endpoints(&config, "https", local_address);

            // Convert tokio listener to std listener for axum-server
            let std_listener = listener.into_std().map_err(Error::Bind)?;

            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();

            tokio::spawn(async move {
                shutdown_signal.cancelled().await;
                shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            axum_server::from_tcp_rustls(std_listener, rustls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(Error::Server)?;
        }
        None => {
            log_endpoints(&config, "http", local_address);

            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown_signal.cancelled().await })
                .await
                .map_err(Error::Server)?;
        }
    }

    log::info!("Server stopped");

    Ok(())
}

/// Routes for the enabled endpoints. Expects a validated configuration, in
/// which the health and info paths never collide.
pub fn router(config: &Config, aggregator: InfoAggregator) -> Router {
    let mut app = Router::new();

    if config.server.health.enabled {
        app = app.route(&config.server.health.path, get(health::handle));
    }

    if config.info.enabled {
        app = app.merge(InfoEndpoint::new(aggregator).router(&config.info.path));
    }

    app
}

fn log_endpoints(config: &Config, scheme: &str, address: SocketAddr) {
    if config.info.enabled {
        log::info!("Info endpoint available at: {scheme}://{address}{}", config.info.path);
    }

    if config.server.health.enabled {
        log::info!("Health endpoint available at: {scheme}://{address}{}", config.server.health.path);
    }
}
