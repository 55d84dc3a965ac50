//! Helpers for driving the assembled API in-process

use anyhow::Context as _;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use rest_resource::prelude::*;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "secret";

/// The foo API with deterministic ids starting at 1000
pub fn foo_app() -> anyhow::Result<Router> {
    foo_app_with(Config::default(), |api| api)
}

/// The foo API with a custom config and extra builder steps
pub fn foo_app_with(
    config: Config,
    customize: impl FnOnce(RestApi) -> RestApi,
) -> anyhow::Result<Router> {
    let handler = FooHandler::new(config.auth.secret.clone())
        .with_id_generator(SequentialIdGenerator::starting_at(1000));
    let api = RestApi::new(config).register_resource_handler(handler)?;
    Ok(customize(api).into_app())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub response_headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response_headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Build a request, authenticated with [`SECRET`] unless `auth` is `None`
pub fn request(
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value)?)
        }
        None => Body::empty(),
    };
    builder.body(body).context("build request")
}

pub async fn send(app: Router, request: Request<Body>) -> anyhow::Result<TestResponse> {
    let response: Response = app.oneshot(request).await?;
    let status = response.status();
    let response_headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is JSON")?
    };
    Ok(TestResponse {
        status,
        response_headers,
        body,
    })
}

/// Assert an error envelope with the given status and code
pub fn assert_error(response: &TestResponse, status: StatusCode, code: &str) {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["status"], status.as_u16());
    assert_eq!(response.body["code"], code);
}
