// Server loop module
// Accepts connections until the shutdown signal fires

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::{accept_connection, ServiceKind};
use crate::config::AppState;

/// Accept loop shared by the application and API listeners
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    kind: ServiceKind,
    shutdown: Arc<Notify>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    // Registered up front so a notification between polls is not lost
    let stopped = shutdown.notified();
    tokio::pin!(stopped);
    stopped.as_mut().enable();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, kind);
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection ({kind:?}): {e}");
                    }
                }
            }

            () = &mut stopped => {
                tracing::info!("Stopping {kind:?} listener");
                break;
            }
        }
    }
}
