//! Request tracking: request IDs and sensitive-header masking
//!
//! Every request gets an `x-request-id` (generated as a TypeID when the client
//! did not send one). The id is echoed on the response and is available to
//! handlers through [`RequestContext::request_id`](crate::context::RequestContext::request_id).

use axum::{http::HeaderName, Router};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::ids::MakeTypedRequestId;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers masked in request logs
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key", "x-auth-token"];

/// Which request tracking layers to install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTrackingConfig {
    /// Generate an id for requests that arrive without one
    pub request_id_enabled: bool,
    /// Copy the request id onto the response
    pub propagate_request_id: bool,
    /// Mask [`SENSITIVE_HEADERS`] in trace output
    pub mask_sensitive_headers: bool,
}

impl Default for RequestTrackingConfig {
    fn default() -> Self {
        Self {
            request_id_enabled: true,
            propagate_request_id: true,
            mask_sensitive_headers: true,
        }
    }
}

impl RequestTrackingConfig {
    pub fn with_request_id(mut self, enabled: bool) -> Self {
        self.request_id_enabled = enabled;
        self
    }

    pub fn with_request_id_propagation(mut self, enabled: bool) -> Self {
        self.propagate_request_id = enabled;
        self
    }

    pub fn with_sensitive_header_masking(mut self, enabled: bool) -> Self {
        self.mask_sensitive_headers = enabled;
        self
    }

    /// Install the enabled layers on a router
    ///
    /// Layers wrap outward, so the id is set before propagation and before
    /// anything added later (such as tracing) sees the request.
    pub fn apply(&self, mut router: Router) -> Router {
        if self.mask_sensitive_headers {
            router = router.layer(sensitive_headers_layer());
        }
        if self.propagate_request_id {
            router = router.layer(request_id_propagation_layer());
        }
        if self.request_id_enabled {
            router = router.layer(request_id_layer());
        }
        router
    }
}

/// Generate `req_`-prefixed TypeIDs for requests without an id
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTypedRequestId)
}

pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(
        SENSITIVE_HEADERS
            .iter()
            .copied()
            .map(HeaderName::from_static),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn echo_router() -> Router {
        Router::new().route(
            "/",
            get(|headers: axum::http::HeaderMap| async move {
                headers
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        )
    }

    #[test]
    fn test_default_config() {
        let config = RequestTrackingConfig::default();
        assert!(config.request_id_enabled);
        assert!(config.propagate_request_id);
        assert!(config.mask_sensitive_headers);

        let config = config.with_request_id(false).with_request_id_propagation(false);
        assert!(!config.request_id_enabled);
        assert!(!config.propagate_request_id);
    }

    #[test]
    fn test_sensitive_headers_include_authorization() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
    }

    #[tokio::test]
    async fn test_generated_id_reaches_handler_and_response() {
        let router = RequestTrackingConfig::default().apply(echo_router());
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let echoed = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(echoed.starts_with("req_"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, echoed.as_bytes());
    }

    #[tokio::test]
    async fn test_client_id_is_kept() {
        let router = RequestTrackingConfig::default().apply(echo_router());
        let request = Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "client-supplied")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "client-supplied");
    }
}
