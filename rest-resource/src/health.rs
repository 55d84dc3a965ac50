//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Crate version
    pub version: String,

    /// Names of the registered resources
    pub resources: Vec<String>,
}

#[derive(Debug)]
struct HealthState {
    service: String,
    resources: Vec<String>,
}

/// Liveness check
///
/// Always returns 200 OK while the process is serving.
async fn health(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.service.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        resources: state.resources.clone(),
    };

    (StatusCode::OK, Json(response))
}

/// Router serving `GET /health`
pub fn health_router(service: impl Into<String>, resources: Vec<String>) -> Router {
    let state = Arc::new(HealthState {
        service: service.into(),
        resources,
    });

    Router::new().route("/health", get(health)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_lists_resources() {
        let router = health_router("foo-api", vec!["foo".to_string()]);
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "foo-api");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health.resources, vec!["foo"]);
    }
}
