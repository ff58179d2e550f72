use axum::{
    extract::{Request, State},
    http::{header::CONTENT_LENGTH, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Upper bound for any declared request body, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct BodyCeiling(pub u64);

/// Rejects obviously hostile requests before routing.
///
/// - path traversal sequences in the URI path (400)
/// - a declared `Content-Length` above the ceiling on POST/PUT (413)
///
/// Scanner user agents are only logged.
pub async fn validate_request_middleware(
    State(ceiling): State<BodyCeiling>,
    req: Request,
    next: Next,
) -> Response {
    if contains_path_traversal(req.uri().path()) {
        return reject(StatusCode::BAD_REQUEST, "INVALID_PATH", "Path traversal detected in request".into());
    }

    if let Some(ua) = req.headers().get("user-agent").and_then(|v| v.to_str().ok()) {
        if is_suspicious_user_agent(ua) {
            tracing::warn!("Suspicious user agent detected: {}", ua);
        }
    }

    if matches!(req.method(), &Method::POST | &Method::PUT) {
        let declared = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        if let Some(length) = declared {
            if length > ceiling.0 {
                return reject(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    format!("Request body exceeds maximum size of {} bytes", ceiling.0),
                );
            }
        }
    }

    next.run(req).await
}

fn reject(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": { "code": code, "message": message },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

/// Detects `..` segments and their percent-encoded forms, plus NUL bytes.
pub(crate) fn contains_path_traversal(path: &str) -> bool {
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return true;
    }
    let lower = path.to_ascii_lowercase();
    ["%2e%2e", "%252e%252e", "%2e.", ".%2e", "%5c", "%00"]
        .iter()
        .any(|pattern| lower.contains(pattern))
        || path.contains('\0')
}

fn is_suspicious_user_agent(ua: &str) -> bool {
    let ua_lower = ua.to_lowercase();
    ["nikto", "sqlmap", "havij", "masscan"].iter().any(|tool| ua_lower.contains(tool))
}
