// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string_pretty(body) {
        Ok(j) => j,
        Err(e) => {
            tracing::error!("Failed to serialize response: {e}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build response: {e}");
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// JSON error body `{"error": {"code": .., "message": ..}}`
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": {
            "code": status.as_u16(),
            "message": message
        }
    });
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))))
}

/// 404 Not Found response
pub fn not_found() -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Not Found",
        "available_endpoints": ["/api/resources", "/api/monitor"]
    });
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Not Found"))))
}

/// 405 Method Not Allowed response
pub fn method_not_allowed() -> Response<Full<Bytes>> {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
