//! HTTP server for the Prometheus metrics endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;

use super::GaugeSet;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// HTTP server exposing the gauges on `/metrics`.
pub struct MetricsServer {
    listener: TcpListener,
    gauges: Arc<GaugeSet>,
}

impl MetricsServer {
    /// Binds the listen socket; failing here is fatal for the exporter.
    pub async fn bind(addr: SocketAddr, gauges: Arc<GaugeSet>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener, gauges })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves scrapes until the process exits.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(self.gauges);

        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(%addr, "Metrics server listening");
        }

        axum::serve(self.listener, app).await?;
        Ok(())
    }
}

/// Handler for the /metrics endpoint.
async fn metrics_handler(State(gauges): State<Arc<GaugeSet>>) -> impl IntoResponse {
    match gauges.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
    }
}
