// Connection handling module
// Handles accepting and serving a single TCP connection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::api;
use crate::config::AppState;
use crate::handler;

/// Which request handler a listener feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Resource serving and health probes
    App,
    /// Management API
    Api,
}

/// Accept and process a connection, enforcing the connection cap.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `kind` - Which handler serves the connection
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    kind: ServiceKind,
) {
    // Increment counter first, then check limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if kind == ServiceKind::App {
        if let Some(max_conn) = state.config.performance.max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                conn_counter.fetch_sub(1, Ordering::SeqCst);
                tracing::warn!(
                    "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
                );
                drop(stream);
                return;
            }
        }
    }

    tracing::debug!("Accepted connection from {peer_addr}");

    handle_connection(stream, Arc::clone(state), Arc::clone(conn_counter), kind);
}

/// Handle a single connection in a spawned task.
///
/// Serves HTTP/1.1 with keep-alive when enabled, bounded by the larger of the
/// read and write timeouts, and decrements the connection counter when done.
fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    kind: ServiceKind,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move {
                    match kind {
                        ServiceKind::App => handler::handle_request(req, state).await,
                        ServiceKind::Api => api::handle_api(req, state).await,
                    }
                }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!("Failed to serve connection: {err:?}"),
            Err(_) => {
                tracing::warn!(
                    "Connection timeout after {} seconds ({kind:?})",
                    timeout_duration.as_secs()
                );
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
