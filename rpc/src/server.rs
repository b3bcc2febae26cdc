//! Axum-based RPC server.

use axum::routing::get;
use axum::Router;
use safereg_assessor::Assessor;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers::{self, AppState};

/// Build the API router over a shared assessor.
pub fn router(assessor: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/api/check/:address", get(handlers::check_address))
        .route("/api/privacy/:address", get(handlers::privacy_analysis))
        .route(
            "/api/reports",
            get(handlers::recent_reports).post(handlers::prepare_submission),
        )
        .route("/api/reports/:id", get(handlers::report_by_id))
        .layer(CorsLayer::permissive())
        .with_state(assessor)
}

pub struct RpcServer {
    pub port: u16,
    pub assessor: Arc<Assessor>,
}

impl RpcServer {
    pub fn new(port: u16, assessor: Arc<Assessor>) -> Self {
        Self { port, assessor }
    }

    /// Serve until `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(Arc::clone(&self.assessor));

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!("HTTP API listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
