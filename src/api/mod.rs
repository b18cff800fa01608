// API module entry
// Management endpoints served on the API listener

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use crate::config::AppState;

pub use types::{MonitorUpdate, MonitorView, ResourceRootView};

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/api/resources") => handlers::handle_resources(&state),
        (&Method::GET, "/api/monitor") => handlers::handle_get_monitor(&state).await,
        (&Method::PUT, "/api/monitor") => handlers::handle_put_monitor(req, state).await,
        (_, "/api/resources" | "/api/monitor") => response::method_not_allowed(),
        _ => response::not_found(),
    };

    tracing::info!("[API] {method} {path} - {}", response.status().as_u16());
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    fn state(base: Option<&TempDir>) -> Arc<AppState> {
        let dir = test_support::fixture_dir();
        let mut cfg = Config::load_from(dir.path().join("absent").to_str().unwrap()).unwrap();
        cfg.resources.base_dir = base.map(|b| b.path().to_string_lossy().into_owned());
        Arc::new(AppState::with_root(&cfg, None))
    }

    fn put(path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::PUT)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    fn get(path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response<Full<Bytes>>) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_resources_without_root() {
        let response = handle_api(get("/api/resources"), state(None)).await.unwrap();
        assert_eq!(response.status(), 200);
        let view: ResourceRootView = json(response).await;
        assert_eq!(view.key, "IMAGE_RESOURCE_DIR");
        assert_eq!(view.root, None);
        assert_eq!(view.source, None);
    }

    #[tokio::test]
    async fn test_put_monitor_persists() {
        let base = test_support::fixture_dir();
        let state = state(Some(&base));

        let response = handle_api(
            put("/api/monitor", r#"{"api_key":"abc","storage_url":"http://remote/s"}"#),
            Arc::clone(&state),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 200);
        let view: MonitorView = json(response).await;
        assert_eq!(view.storage_url, "http://remote/s");
        assert!(view.api_key_configured);

        let saved = base.path().join("monitoring").join("controller.properties");
        assert!(std::fs::read_to_string(saved).unwrap().contains("apikey=abc"));

        let view: MonitorView = json(handle_api(get("/api/monitor"), state).await.unwrap()).await;
        assert_eq!(view.storage_url, "http://remote/s");
    }

    #[tokio::test]
    async fn test_put_monitor_without_key_conflicts() {
        let base = test_support::fixture_dir();
        let state = state(Some(&base));

        let response = handle_api(put("/api/monitor", r#"{"check_url":"http://c"}"#), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(response.status(), 409);

        // rejected update is not applied in memory either
        let view: MonitorView = json(handle_api(get("/api/monitor"), state).await.unwrap()).await;
        assert_eq!(view.check_url, "http://localhost:8090/check");
    }

    #[tokio::test]
    async fn test_bad_json_and_unknown_paths() {
        let state = state(None);
        let response = handle_api(put("/api/monitor", "{not json"), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let response = handle_api(get("/api/other"), Arc::clone(&state)).await.unwrap();
        assert_eq!(response.status(), 404);

        let response = handle_api(put("/api/resources", "{}"), state).await.unwrap();
        assert_eq!(response.status(), 405);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_puts_leave_file_and_memory_in_step() {
        let base = test_support::fixture_dir();
        let state = state(Some(&base));

        let (a, b) = tokio::join!(
            handle_api(
                put("/api/monitor", r#"{"api_key":"k","storage_url":"http://a"}"#),
                Arc::clone(&state)
            ),
            handle_api(
                put("/api/monitor", r#"{"api_key":"k","storage_url":"http://b"}"#),
                Arc::clone(&state)
            ),
        );
        assert_eq!(a.unwrap().status(), 200);
        assert_eq!(b.unwrap().status(), 200);

        let view: MonitorView = json(handle_api(get("/api/monitor"), state).await.unwrap()).await;
        let saved = base.path().join("monitoring").join("controller.properties");
        let written = std::fs::read_to_string(saved).unwrap();
        assert!(written.contains(&format!("url={}", view.storage_url)));
    }
}
