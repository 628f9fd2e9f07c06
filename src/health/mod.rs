//! Liveness endpoint.
//!
//! `GET /health` answers from the proxy alone; the upstream is never
//! contacted, so it reports process liveness rather than upstream health.

use axum::Json;
use serde::Serialize;

/// Body of a health response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Always `200 {"status":"ok"}`.
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn reports_ok() {
        let app = Router::new().route("/health", get(health_handler));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }
}
