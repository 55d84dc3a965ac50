//! The `foo` resource
//!
//! A simulated resource with no storage behind it. Reads return canned
//! entities, writes echo the request back, and every request must carry the
//! shared secret in its `Authorization` header.
//!
//! ```rust
//! use rest_resource::foo::FooHandler;
//! use rest_resource::ids::SequentialIdGenerator;
//!
//! let handler = FooHandler::new("secret").with_id_generator(SequentialIdGenerator::default());
//! ```

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::handlers::{ApiError, ResourceHandler, ResourceList};
use crate::ids::{IdGenerator, RandomIdGenerator};
use crate::payload::Payload;

/// Resource name used in URLs (`/api/v1/foo`)
pub const FOO_RESOURCE: &str = "foo";

/// Id of the one entity [`FooHandler`] can read
const KNOWN_ID: &str = "42";

/// The Foo entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foo {
    pub id: i64,
    pub foobar: String,
}

impl Foo {
    pub fn new(id: i64, foobar: impl Into<String>) -> Self {
        Self {
            id,
            foobar: foobar.into(),
        }
    }
}

/// Handler for the `foo` resource
#[derive(Clone)]
pub struct FooHandler {
    secret: String,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for FooHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FooHandler").finish_non_exhaustive()
    }
}

impl FooHandler {
    /// Handler accepting requests whose `Authorization` header equals `secret`
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ids: Arc::new(RandomIdGenerator),
        }
    }

    /// Replace the source of ids for created entities
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }
}

impl Default for FooHandler {
    fn default() -> Self {
        Self::new("secret")
    }
}

/// Numeric id from a path segment; anything unparseable becomes 0
fn parse_id(id: &str) -> i64 {
    id.parse().unwrap_or(0)
}

/// The `foobar` field, or empty when absent or not a string
fn foobar(payload: &Payload) -> String {
    payload.get_string("foobar").unwrap_or_default().to_string()
}

impl ResourceHandler for FooHandler {
    type Resource = Foo;

    fn resource_name(&self) -> &str {
        FOO_RESOURCE
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        match headers.get(header::AUTHORIZATION) {
            Some(value) if value.as_bytes() == self.secret.as_bytes() => Ok(()),
            _ => Err(ApiError::unauthorized("You shall not pass").with_resource(FOO_RESOURCE)),
        }
    }

    async fn create_resource(
        &self,
        _ctx: &RequestContext,
        payload: Payload,
        _version: &str,
    ) -> Result<Foo, ApiError> {
        Ok(Foo::new(self.ids.next_id(), foobar(&payload)))
    }

    async fn read_resource(
        &self,
        _ctx: &RequestContext,
        id: &str,
        _version: &str,
    ) -> Result<Foo, ApiError> {
        if id == KNOWN_ID {
            Ok(Foo::new(42, "hello world"))
        } else {
            Err(ApiError::not_found(FOO_RESOURCE, id))
        }
    }

    async fn read_resource_list(
        &self,
        _ctx: &RequestContext,
        _limit: usize,
        _cursor: &str,
        _version: &str,
    ) -> Result<ResourceList<Foo>, ApiError> {
        Ok(ResourceList::last_page(vec![
            Foo::new(1, "hello"),
            Foo::new(2, "world"),
        ]))
    }

    async fn update_resource(
        &self,
        _ctx: &RequestContext,
        id: &str,
        payload: Payload,
        _version: &str,
    ) -> Result<Foo, ApiError> {
        Ok(Foo::new(parse_id(id), foobar(&payload)))
    }

    async fn delete_resource(
        &self,
        _ctx: &RequestContext,
        id: &str,
        _version: &str,
    ) -> Result<Foo, ApiError> {
        Ok(Foo::new(parse_id(id), "Goodbye world"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{ApiErrorKind, ApiOperation};
    use crate::ids::SequentialIdGenerator;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn handler() -> FooHandler {
        FooHandler::default().with_id_generator(SequentialIdGenerator::starting_at(100))
    }

    fn ctx() -> RequestContext {
        RequestContext::new("1")
    }

    fn payload(value: serde_json::Value) -> Payload {
        Payload::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_read_known_id() {
        let foo = handler().read_resource(&ctx(), "42", "1").await.unwrap();
        assert_eq!(foo, Foo::new(42, "hello world"));
    }

    #[tokio::test]
    async fn test_read_unknown_id() {
        let err = handler().read_resource(&ctx(), "7", "1").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Read);
        assert_eq!(err.message, "No resource with id 7");
        assert_eq!(err.resource_id.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_read_list_ignores_paging() {
        for (limit, cursor) in [(1, ""), (100, "abc"), (1000, "zzz")] {
            let page = handler()
                .read_resource_list(&ctx(), limit, cursor, "1")
                .await
                .unwrap();
            assert_eq!(
                page.resources,
                vec![Foo::new(1, "hello"), Foo::new(2, "world")]
            );
            assert!(!page.has_more());
        }
    }

    #[tokio::test]
    async fn test_create_uses_generator_and_payload() {
        let handler = handler();
        let first = handler
            .create_resource(&ctx(), payload(json!({"foobar": "new"})), "1")
            .await
            .unwrap();
        assert_eq!(first, Foo::new(100, "new"));

        let second = handler
            .create_resource(&ctx(), payload(json!({"other": 1})), "1")
            .await
            .unwrap();
        assert_eq!(second, Foo::new(101, ""));

        let mistyped = handler
            .create_resource(&ctx(), payload(json!({"foobar": 5})), "1")
            .await
            .unwrap();
        assert_eq!(mistyped.foobar, "");
    }

    #[tokio::test]
    async fn test_create_with_random_ids() {
        let foo = FooHandler::default()
            .create_resource(&ctx(), payload(json!({"foobar": "x"})), "1")
            .await
            .unwrap();
        assert!(foo.id >= 0);
        assert_eq!(foo.foobar, "x");
    }

    #[tokio::test]
    async fn test_update_parses_id() {
        let foo = handler()
            .update_resource(&ctx(), "17", payload(json!({"foobar": "changed"})), "1")
            .await
            .unwrap();
        assert_eq!(foo, Foo::new(17, "changed"));

        let foo = handler()
            .update_resource(&ctx(), "abc", payload(json!({})), "1")
            .await
            .unwrap();
        assert_eq!(foo, Foo::new(0, ""));
    }

    #[tokio::test]
    async fn test_delete_parses_id() {
        let foo = handler().delete_resource(&ctx(), "9", "1").await.unwrap();
        assert_eq!(foo, Foo::new(9, "Goodbye world"));

        let foo = handler().delete_resource(&ctx(), "nope", "1").await.unwrap();
        assert_eq!(foo.id, 0);
    }

    #[test]
    fn test_authenticate() {
        let handler = handler();

        let mut headers = HeaderMap::new();
        assert_eq!(
            handler.authenticate(&headers).unwrap_err().kind,
            ApiErrorKind::Unauthorized
        );

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("wrong"));
        let err = handler.authenticate(&headers).unwrap_err();
        assert_eq!(err.message, "You shall not pass");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("secret"));
        assert!(handler.authenticate(&headers).is_ok());

        // only the first value counts
        headers.append(header::AUTHORIZATION, HeaderValue::from_static("wrong"));
        assert!(handler.authenticate(&headers).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("wrong"));
        headers.append(header::AUTHORIZATION, HeaderValue::from_static("secret"));
        assert!(handler.authenticate(&headers).is_err());
    }

    #[test]
    fn test_custom_secret() {
        let handler = FooHandler::new("hunter2");
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("secret"));
        assert!(handler.authenticate(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("hunter2"));
        assert!(handler.authenticate(&headers).is_ok());
    }

    #[test]
    fn test_entity_wire_form() {
        let value = serde_json::to_value(Foo::new(1, "hello")).unwrap();
        assert_eq!(value, json!({"id": 1, "foobar": "hello"}));
    }
}
