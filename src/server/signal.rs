// Signal handling module
//
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Wait for a termination signal, then wake every accept loop
pub async fn wait_for_shutdown(shutdown: Arc<Notify>) {
    terminated().await;
    tracing::info!("Shutdown signal received");
    shutdown.notify_waiters();
}

#[cfg(unix)]
async fn terminated() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to register SIGTERM handler: {e}");
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        () = ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn terminated() {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
