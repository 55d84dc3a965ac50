//! HTTP server with graceful shutdown

use axum::{extract::DefaultBodyLimit, http::StatusCode, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{config::Config, error::Result, middleware::RequestTrackingConfig};

/// Server instance
pub struct Server {
    config: Config,
    tracking: RequestTrackingConfig,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tracking: RequestTrackingConfig::default(),
        }
    }

    /// Override which request tracking layers are installed
    pub fn with_request_tracking(mut self, tracking: RequestTrackingConfig) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bind the configured port and serve until SIGINT/SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(addr).await?;
        self.serve_on(listener, app).await
    }

    /// Serve on an already-bound listener until SIGINT/SIGTERM
    pub async fn serve_on(self, listener: TcpListener, app: Router) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.apply_middleware(app);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Wrap a router in the standard middleware stack
    ///
    /// Later layers are outer: panics are caught outermost, then CORS,
    /// compression, timeout, body limit, request tracking and tracing.
    /// `body_limit_mb` also replaces axum's 2 MB extractor default.
    pub fn apply_middleware(&self, app: Router) -> Router {
        let body_limit = self.config.middleware.body_limit_mb * 1024 * 1024;

        let app = app.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        );

        self.tracking
            .apply(app)
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ))
            .layer(CompressionLayer::new())
            .layer(self.build_cors_layer())
            .layer(CatchPanicLayer::new())
    }

    fn log_middleware_config(&self) {
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Request ID tracking: {}", self.tracking.request_id_enabled);
        tracing::info!(
            "  - Sensitive header masking: {}",
            self.tracking.mask_sensitive_headers
        );
        tracing::info!(
            "  - Request body limit: {} MB",
            self.config.middleware.body_limit_mb
        );
        tracing::info!("  - CORS mode: {}", self.config.middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
    }

    fn build_cors_layer(&self) -> CorsLayer {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => CorsLayer::permissive(),
            "restrictive" | "disabled" => CorsLayer::new(),
            other => {
                tracing::warn!("Unknown CORS mode: {}, defaulting to permissive", other);
                CorsLayer::permissive()
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::post};
    use tower::ServiceExt;

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, config.service.port);
    }

    fn upload_app(body_limit_mb: usize) -> Router {
        let mut config = Config::default();
        config.middleware.body_limit_mb = body_limit_mb;

        Server::new(config).apply_middleware(Router::new().route(
            "/upload",
            post(|body: axum::body::Bytes| async move { body.len().to_string() }),
        ))
    }

    fn upload(len: usize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from(vec![0u8; len]))
            .unwrap()
    }

    #[tokio::test]
    async fn test_body_limit_enforced() {
        let response = upload_app(1).oneshot(upload(2 * 1024 * 1024)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_body_limit_above_extractor_default() {
        let len = 3 * 1024 * 1024;
        let response = upload_app(10).oneshot(upload(len)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, len.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_request_id_added() {
        let server = Server::new(Config::default());
        let app = server
            .apply_middleware(Router::new().route("/", axum::routing::get(|| async { "ok" })));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
