use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Serves Kubernetes metadata about this instance over HTTP.
#[derive(Debug, Parser)]
#[command(name = "kubeinfo", version)]
pub struct Args {
    /// Path to the TOML configuration file. Without it, defaults are used.
    #[arg(short, long, env = "KUBEINFO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on. Overrides `server.listen_address`.
    #[arg(short, long, env = "KUBEINFO_LISTEN_ADDRESS")]
    pub listen_address: Option<SocketAddr>,

    /// Log filter, e.g. "info" or "server=debug,info=debug".
    #[arg(long, env = "KUBEINFO_LOG", default_value = "info")]
    pub log: String,
}
