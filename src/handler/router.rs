//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, health probes,
//! and handing resource paths to the resource server.

use crate::config::AppState;
use crate::http::{self, cache, BufferedSink};
use crate::logger;
use crate::resources;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CACHE_CONTROL, ETAG, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

const LIVENESS_PATH: &str = "/healthz";
const READINESS_PATH: &str = "/readyz";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method) {
        log_access(&state, method, path, &resp);
        return Ok(resp);
    }

    // 2. Extract headers for conditional requests
    let ctx = RequestContext {
        path,
        is_head: *method == Method::HEAD,
        if_none_match: req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    // 3. Dispatch
    let response = route_request(&ctx, &state).await;
    log_access(&state, method, path, &response);
    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            tracing::warn!("Method not allowed: {method}");
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if ctx.path == LIVENESS_PATH {
        return http::build_health_response(true);
    }
    if ctx.path == READINESS_PATH {
        return http::build_health_response(state.resource_root.is_some());
    }

    if ctx.path.starts_with(&state.config.resources.route_prefix) {
        return serve_resource(ctx, state).await;
    }

    http::build_404_response()
}

/// Serve a resource file, answering 304 when the client's copy is current
async fn serve_resource(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let mut sink = BufferedSink::new();
    if let Some(cache_control) = &state.config.resources.cache_control {
        match HeaderValue::from_str(cache_control) {
            Ok(value) => sink = sink.with_header(CACHE_CONTROL, value),
            Err(e) => tracing::warn!("Ignoring invalid resources.cache_control '{cache_control}': {e}"),
        }
    }

    if !resources::serve(state.resource_root.as_ref(), ctx.path, &mut sink).await {
        return http::build_404_response();
    }

    if let Some(etag) = sink.header_str(&ETAG) {
        if cache::check_etag_match(ctx.if_none_match.as_deref(), etag) {
            let cache_control = sink
                .header_str(&CACHE_CONTROL)
                .unwrap_or(cache::DEFAULT_CACHE_CONTROL);
            return http::build_304_response(etag, cache_control);
        }
    }

    sink.into_response(ctx.is_head)
}

fn log_access(state: &AppState, method: &Method, path: &str, response: &Response<Full<Bytes>>) {
    if state.config.logging.access_log {
        let bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        logger::log_access(method.as_str(), path, response.status().as_u16(), bytes);
    }
}
