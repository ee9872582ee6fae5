use std::future::Future;

use axum::Router;
use configs::AppConfig;
use service::items::MemoryItemStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes::{self, ServerState};

/// Serve `app` on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C; shutdown signal disabled");
            std::future::pending::<()>().await
        }
    }
}

/// Public entry: build the store and router, then run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store = MemoryItemStore::new();
    let state = ServerState::new(store);
    let app = routes::build_router(state);

    let addr = cfg.server.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "item store listening");
    serve(listener, app, shutdown_signal()).await
}
