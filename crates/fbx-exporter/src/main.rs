//! fbx-exporter - Prometheus exporter for Freebox routers.
//!
//! Registers itself on the router on first run, then polls the router's
//! local API every few seconds and serves the readings on `/metrics`.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fbx_exporter_core::api::{RequestExecutor, RouterClient};
use fbx_exporter_core::auth::{ApprovalPolicy, Authenticator, CredentialStore, Registrar, SessionManager};
use fbx_exporter_core::config::{self, ExporterConfig};
use fbx_exporter_core::metrics::{GaugeSet, MetricsServer};
use fbx_exporter_core::models::AppIdentity;
use fbx_exporter_core::Exporter;

#[derive(Debug, Parser)]
#[command(name = "fbx-exporter", version, about = "Prometheus exporter for Freebox routers")]
struct Cli {
    /// Endpoint for the Freebox API
    #[arg(long, env = "FBX_ENDPOINT", default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Address the metrics endpoint listens on (`:port` binds every interface)
    #[arg(long, env = "FBX_LISTEN", default_value = config::DEFAULT_LISTEN)]
    listen: String,

    /// Debug logging
    #[arg(long, env = "FBX_DEBUG")]
    debug: bool,

    /// Fiber Freebox: there is no DSL line to report on
    #[arg(long, env = "FBX_FIBER")]
    fiber: bool,

    /// Application token file [default: ~/.freebox_token]
    #[arg(long, env = "FBX_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Seconds between two collections
    #[arg(long, env = "FBX_INTERVAL", default_value_t = 10)]
    interval: u64,
}

impl Cli {
    fn into_config(self) -> Result<ExporterConfig> {
        let mut config = ExporterConfig::new(&self.endpoint, &self.listen, self.token_file)?;
        config.fiber = self.fiber;
        config.poll_interval = Duration::from_secs(self.interval.max(1));
        Ok(config)
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(debug: bool) {
    // RUST_LOG wins over --debug
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.debug);
    let config = cli.into_config()?;
    info!(endpoint = %config.endpoint, fiber = config.fiber, "fbx-exporter starting");

    let gauges = Arc::new(GaugeSet::new()?);
    let server = MetricsServer::bind(config.listen, Arc::clone(&gauges)).await?;

    let client = RouterClient::new(config.endpoints())?;
    let store = CredentialStore::new(&config.token_file);
    let credential = Registrar::new(&client, &store, ApprovalPolicy::default())
        .load_or_register(AppIdentity::default())
        .await
        .context("Could not register the exporter on the router")?;

    let session = Arc::new(SessionManager::new(Authenticator::new(client.clone(), credential)));
    session
        .valid_token()
        .await
        .context("Initial login to the router failed")?;

    let exporter = Exporter::new(RequestExecutor::new(client, session), Arc::clone(&gauges), &config);
    tokio::spawn(exporter.run());

    server.run().await?;
    Ok(())
}
