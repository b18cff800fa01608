// Management API handlers module

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use std::fmt::Display;
use std::sync::Arc;

use super::response::{error_response, json_response};
use super::types::{MonitorUpdate, MonitorView, ResourceRootView};
use crate::config::AppState;
use crate::error::MonitorError;
use crate::monitor::MonitorProperties;
use crate::resources::RESOURCE_DIR_KEY;

/// Report the resolved resource root and where it came from
pub fn handle_resources(state: &AppState) -> Response<Full<Bytes>> {
    let view = ResourceRootView {
        key: RESOURCE_DIR_KEY.to_string(),
        root: state
            .resource_root
            .as_ref()
            .map(|root| root.path().display().to_string()),
        source: state
            .resource_root
            .as_ref()
            .map(|root| root.source().to_string()),
    };
    json_response(StatusCode::OK, &view)
}

/// Current monitor endpoints
pub async fn handle_get_monitor(state: &AppState) -> Response<Full<Bytes>> {
    let monitor = state.monitor.read().await;
    json_response(StatusCode::OK, &monitor_view(&monitor))
}

/// Apply a partial monitor update and persist it
pub async fn handle_put_monitor<B>(req: Request<B>, state: Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Display,
{
    let whole_body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Failed to read request body: {e}"),
            );
        }
    };

    let update: MonitorUpdate = match serde_json::from_slice(&whole_body) {
        Ok(u) => u,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {e}"));
        }
    };

    let mut monitor = state.monitor.write().await;
    let mut updated = monitor.clone();
    if let Some(url) = update.storage_url {
        updated.set_storage_url(url);
    }
    if let Some(url) = update.check_url {
        updated.set_check_url(url);
    }
    if let Some(key) = update.api_key {
        updated.set_api_key(key);
    }

    // The write guard stays held so concurrent updates persist in order
    let saved = tokio::task::spawn_blocking(move || {
        let result = updated.save();
        (updated, result)
    })
    .await;
    let (updated, result) = match saved {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Monitor properties save task failed: {e}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    match result {
        Ok(()) => {
            tracing::info!("Monitor properties saved");
            *monitor = updated;
            json_response(StatusCode::OK, &monitor_view(&monitor))
        }
        Err(e @ MonitorError::MissingApiKey(_)) => {
            tracing::warn!("{e}");
            error_response(StatusCode::CONFLICT, &e.to_string())
        }
        Err(e) => {
            tracing::error!("{e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn monitor_view(monitor: &MonitorProperties) -> MonitorView {
    MonitorView {
        storage_url: monitor.storage_url().to_string(),
        check_url: monitor.check_url().to_string(),
        api_key_configured: monitor.api_key().is_some(),
    }
}
