//! JSON HTTP API consumed by the dashboard.
//!
//! Exposes alert CRUD, manual triggers, the activity log, settings and
//! counters over an axum router that shares one [`AlertController`].

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::orchestrator::AlertController;
use crate::{AppError, Result};

pub use routes::router;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Config(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyConsumed(_) => StatusCode::CONFLICT,
            Self::Generation(_) | Self::Http(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Bind `addr` and serve the API until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Http` if the listener cannot be bound or the server
/// fails.
pub async fn serve_http(
    addr: SocketAddr,
    controller: Arc<AlertController>,
    ct: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::Http(format!("failed to bind {addr}: {err}")))?;
    serve(listener, controller, ct).await
}

/// Serve the API on an already bound listener until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Http` if the server fails.
pub async fn serve(
    listener: TcpListener,
    controller: Arc<AlertController>,
    ct: CancellationToken,
) -> Result<()> {
    let local = listener
        .local_addr()
        .map_err(|err| AppError::Http(format!("listener has no local address: {err}")))?;
    info!(%local, "starting HTTP API");

    axum::serve(listener, router(controller))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Http(format!("server error: {err}")))?;

    info!("HTTP API shut down");
    Ok(())
}
