//! API server lifecycle: bind, spawn the axum server in the background,
//! return a handle with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::build_router;
use crate::api::types::ApiContext;
use crate::engine::SymptomEngine;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Metadata for a running API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiServerSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ApiServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Signal the server to stop accepting connections.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to drain.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Start the API server on `addr` (port 0 picks an ephemeral port).
pub async fn start_api_server_on(
    engine: Arc<SymptomEngine>,
    addr: SocketAddr,
    request_timeout: Duration,
) -> Result<ApiServer, std::io::Error> {
    // 1. Bind
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "API server binding");

    // 2. Build the router; its context carries the instance identity
    let ctx = ApiContext::new(engine, request_timeout);
    let session = ApiServerSession {
        session_id: ctx.session_id.clone(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: ctx.started_at.clone(),
    };
    let app = build_router(ctx);

    // 3. Set up shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // 4. Spawn server in background task
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
