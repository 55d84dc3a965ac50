//! Axum routes that drive a [`ResourceHandler`]
//!
//! For a handler named `n` under base path `b` this mounts:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | POST | `b/{version}/n` | create (object body) or create list (array body) |
//! | GET | `b/{version}/n` | read list |
//! | PUT | `b/{version}/n` | update list |
//! | DELETE | `b/{version}/n` | delete list |
//! | GET | `b/{version}/n/{id}` | read |
//! | PUT | `b/{version}/n/{id}` | update |
//! | DELETE | `b/{version}/n/{id}` | delete |
//!
//! Every request is authenticated first, then its version is checked, then
//! `limit`/`next` are resolved, then the body is decoded.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ApiError, ApiErrorKind, ApiOperation};
use super::query::{LimitPolicy, ListQuery};
use super::response::Envelope;
use super::traits::ResourceHandler;
use crate::context::RequestContext;
use crate::middleware::REQUEST_ID_HEADER;
use crate::payload::Payload;
use crate::versioning::ApiVersion;

/// Shared state for one handler's routes
pub(crate) struct HandlerState<H> {
    handler: Arc<H>,
    limits: LimitPolicy,
}

// Derive would require `H: Clone`
impl<H> Clone for HandlerState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            limits: self.limits,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionPath {
    version: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemPath {
    version: String,
    id: String,
}

/// Build the router for one resource handler
pub(crate) fn resource_router<H: ResourceHandler>(
    handler: Arc<H>,
    base_path: &str,
    limits: LimitPolicy,
) -> Router {
    let collection = format!("{}/{{version}}/{}", base_path, handler.resource_name());
    let item = format!("{}/{{id}}", collection);

    let state = HandlerState { handler, limits };

    Router::new()
        .route(
            &collection,
            post(create::<H>)
                .get(read_list::<H>)
                .put(update_list::<H>)
                .delete(delete_list::<H>),
        )
        .route(&item, get(read::<H>).put(update::<H>).delete(delete::<H>))
        .with_state(state)
}

/// Operation a method would map to on an item route
fn operation_for(method: &Method) -> ApiOperation {
    match *method {
        Method::POST => ApiOperation::Create,
        Method::PUT | Method::PATCH => ApiOperation::Update,
        Method::DELETE => ApiOperation::Delete,
        _ => ApiOperation::Read,
    }
}

/// Answer for paths that match no registered route
pub(crate) async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        operation_for(&method),
        ApiErrorKind::NotFound,
        format!("No route for {} {}", method, uri.path()),
    )
}

/// Answer for known paths hit with a method they do not route
pub(crate) async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        operation_for(&method),
        ApiErrorKind::MethodNotAllowed,
        format!("Method {} is not allowed on {}", method, uri.path()),
    )
}

impl<H: ResourceHandler> HandlerState<H> {
    /// Authenticate, validate the version and resolve pagination
    fn context(
        &self,
        operation: ApiOperation,
        version: &str,
        id: Option<&str>,
        headers: HeaderMap,
        query: HashMap<String, String>,
    ) -> Result<RequestContext, ApiError> {
        let name = self.handler.resource_name();

        self.handler
            .authenticate(&headers)
            .map_err(|e| self.tag(e, id))?;

        let version = ApiVersion::parse(version).ok_or_else(|| {
            self.tag(
                ApiError::bad_request(operation, format!("Invalid API version '{}'", version)),
                id,
            )
        })?;

        if let Some(valid) = self.handler.valid_versions() {
            if !valid.contains(&version.as_str()) {
                return Err(self.tag(
                    ApiError::bad_request(
                        operation,
                        format!("API version {} is not supported by resource {}", version, name),
                    ),
                    id,
                ));
            }
        }

        let list = ListQuery::from_params(&query, self.limits, operation)
            .map_err(|e| self.tag(e, id))?;

        tracing::debug!(
            resource = name,
            operation = %operation,
            version = version.as_str(),
            resource_id = ?id,
            "Dispatching resource request"
        );

        let mut ctx = RequestContext::new(version.as_str())
            .with_limit(list.limit())
            .with_cursor(list.cursor())
            .with_query(query);

        if let Some(request_id) = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            ctx = ctx.with_request_id(request_id);
        }
        if let Some(id) = id {
            ctx = ctx.with_resource_id(id);
        }

        Ok(ctx.with_headers(headers))
    }

    /// Fill in the resource name and id when the handler left them out
    fn tag(&self, mut error: ApiError, id: Option<&str>) -> ApiError {
        if error.resource.is_none() {
            error = error.with_resource(self.handler.resource_name());
        }
        if let (None, Some(id)) = (&error.resource_id, id) {
            error = error.with_resource_id(id);
        }
        error
    }
}

fn respond<T: Serialize>(envelope: Envelope<T>, ctx: &RequestContext) -> Response {
    envelope.with_messages(ctx.messages()).into_response()
}

fn parse_body(body: &Bytes, operation: ApiOperation) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request(operation, "Request body is empty"));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(operation, format!("Invalid JSON body: {}", e)))
}

fn object_payload(value: Value, operation: ApiOperation) -> Result<Payload, ApiError> {
    Payload::from_value(value).map_err(|e| ApiError::from(e).with_operation(operation))
}

fn list_payloads(value: Value, operation: ApiOperation) -> Result<Vec<Payload>, ApiError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| object_payload(item, operation))
            .collect(),
        _ => Err(ApiError::bad_request(
            operation,
            "Request body must be a JSON array",
        )),
    }
}

async fn create<H: ResourceHandler>(
    State(state): State<HandlerState<H>>,
    Path(path): Path<CollectionPath>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let ctx = state.context(ApiOperation::Create, &path.version, None, headers, query)?;

    match parse_body(&body, ApiOperation::Create).map_err(|e| state.tag(e, None))? {
        value @ Value::Array(_) => {
            let payloads = list_payloads(value, ApiOperation::CreateList)
                .map_err(|e| state.tag(e, None))?;
            let created = state
                .handler
                .create_resource_list(&ctx, payloads, ctx.version())
                .await
                .map_err(|e| state.tag(e, None))?;
            Ok(respond(Envelope::created(created), &ctx))
        }
        value => {
            let payload =
                object_payload(value, ApiOperation::Create).map_err(|e| state.tag(e, None))?;
            let created = state
                .handler
                .create_resource(&ctx, payload, ctx.version())
                .await
                .map_err(|e| state.tag(e, None))?;
            Ok(respond(Envelope::created(created), &ctx))
        }
    }
}

async fn read_list<H: ResourceHandler>(
    State(state): State<HandlerState<H>>,
    Path(path): Path<CollectionPath>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let ctx = state.context(ApiOperation::ReadList, &path.version, None, headers, query)?;

    let page = state
        .handler
        .read_resource_list(&ctx, ctx.limit(), ctx.cursor(), ctx.version())
        .await
        .map_err(|e| state.tag(e, None))?;

    Ok(respond(Envelope::ok(page.resources).with_next(page.cursor), &ctx))
}

async fn update_list<H: ResourceHandler>(
    State(state): State<HandlerState<H>>,
    Path(path): Path<CollectionPath>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let ctx = state.context(ApiOperation::UpdateList, &path.version, None, headers, query)?;

    let payloads = parse_body(&body, ApiOperation::UpdateList)
        .and_then(|value| list_payloads(value, ApiOperation::UpdateList))
        .map_err(|e| state.tag(e, None))?;

    let updated = state
        .handler
        .update_resource_list(&ctx, payloads, ctx.version())
        .await
        .map_err(|e| state.tag(e, None))?;

    Ok(respond(Envelope::ok(updated), &ctx))
}

async fn delete_list<H: ResourceHandler>(
    State(state): State<HandlerState<H>>,
    Path(path): Path<CollectionPath>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let ctx = state.context(ApiOperation::DeleteList, &path.version, None, headers, query)?;

    let page = state
        .handler
        .delete_resource_list(&ctx, ctx.limit(), ctx.cursor(), ctx.version())
        .await
        .map_err(|e| state.tag(e, None))?;

    Ok(respond(Envelope::ok(page.resources).with_next(page.cursor), &ctx))
}

async fn read<H: ResourceHandler>(
    State(state): State<HandlerState<H>>,
    Path(path): Path<ItemPath>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = Some(path.id.as_str());
    let ctx = state.context(ApiOperation::Read, &path.version, id, headers, query)?;

    let resource = state
        .handler
        .read_resource(&ctx, &path.id, ctx.version())
        .await
        .map_err(|e| state.tag(e, id))?;

    Ok(respond(Envelope::ok(resource), &ctx))
}

async fn update<H: ResourceHandler>(
    State(state): State<HandlerState<H>>,
    Path(path): Path<ItemPath>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = Some(path.id.as_str());
    let ctx = state.context(ApiOperation::Update, &path.version, id, headers, query)?;

    let payload = parse_body(&body, ApiOperation::Update)
        .and_then(|value| object_payload(value, ApiOperation::Update))
        .map_err(|e| state.tag(e, id))?;

    let resource = state
        .handler
        .update_resource(&ctx, &path.id, payload, ctx.version())
        .await
        .map_err(|e| state.tag(e, id))?;

    Ok(respond(Envelope::ok(resource), &ctx))
}

async fn delete<H: ResourceHandler>(
    State(state): State<HandlerState<H>>,
    Path(path): Path<ItemPath>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = Some(path.id.as_str());
    let ctx = state.context(ApiOperation::Delete, &path.version, id, headers, query)?;

    let resource = state
        .handler
        .delete_resource(&ctx, &path.id, ctx.version())
        .await
        .map_err(|e| state.tag(e, id))?;

    Ok(respond(Envelope::ok(resource), &ctx))
}
