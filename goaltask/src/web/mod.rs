//! Web UI
//!
//! One server-rendered page plus the breakdown preview/download endpoints.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | Form, examples, current breakdown |
//! | `POST /example` | Pre-fill the form from an example goal |
//! | `POST /generate` | Submit a goal |
//! | `GET /breakdown/preview` | Breakdown HTML for the preview frame |
//! | `GET /breakdown/download` | Breakdown as a `.html` attachment |
//! | `GET /health` | Liveness |

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod cookie;
mod handlers;
pub mod views;

use crate::service::{BreakdownService, SharedService};
use views::Views;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: SharedService,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(service: BreakdownService) -> Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            views: Arc::new(Views::new()?),
        })
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/example", post(handlers::select_example))
        .route("/generate", post(handlers::generate))
        .route("/breakdown/preview", get(handlers::preview))
        .route("/breakdown/download", get(handlers::download))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    let local = listener.local_addr().context("Failed to read bound address")?;
    info!("goaltask listening on http://{}", local);
    println!("goaltask listening on http://{}", local);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("goaltask stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
