//! The resource handler trait
//!
//! A [`ResourceHandler`] binds one named resource type to its CRUD logic. The
//! framework owns routing, authentication ordering, version checks, payload
//! decoding and the response envelope; the handler only produces entities or
//! [`ApiError`]s.
//!
//! Methods use RPITIT (Return Position Impl Trait In Traits), so implementors
//! can write plain `async fn` without `async_trait`.
//!
//! Every data operation has a default that answers 405 Method Not Allowed, so a
//! handler implements only what its resource supports.
//!
//! # Example
//!
//! ```rust
//! use rest_resource::prelude::*;
//! use std::result::Result;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Widget {
//!     id: i64,
//! }
//!
//! struct WidgetHandler;
//!
//! impl ResourceHandler for WidgetHandler {
//!     type Resource = Widget;
//!
//!     fn resource_name(&self) -> &str {
//!         "widget"
//!     }
//!
//!     async fn read_resource(
//!         &self,
//!         _ctx: &RequestContext,
//!         id: &str,
//!         _version: &str,
//!     ) -> Result<Widget, ApiError> {
//!         let id = id.parse().map_err(|_| ApiError::not_found("widget", id))?;
//!         Ok(Widget { id })
//!     }
//! }
//! ```

use std::future::Future;

use axum::http::HeaderMap;
use serde::Serialize;

use super::error::{ApiError, ApiOperation};
use super::response::ResourceList;
use crate::context::RequestContext;
use crate::payload::Payload;

/// CRUD handler for a single named resource
///
/// Handlers are shared across requests behind an `Arc` and must not rely on
/// per-call mutable state.
pub trait ResourceHandler: Send + Sync + 'static {
    /// Entity type returned by every operation
    type Resource: Serialize + Send;

    /// Name used as the URL path segment (`/api/v1/<name>`)
    fn resource_name(&self) -> &str;

    /// Versions this handler serves (without the `v` prefix)
    ///
    /// `None` accepts every well-formed version.
    fn valid_versions(&self) -> Option<&[&str]> {
        None
    }

    /// Check the request headers before any other processing
    ///
    /// The default allows every request.
    fn authenticate(&self, _headers: &HeaderMap) -> Result<(), ApiError> {
        Ok(())
    }

    /// Create one resource from a JSON object payload
    fn create_resource(
        &self,
        _ctx: &RequestContext,
        _payload: Payload,
        _version: &str,
    ) -> impl Future<Output = Result<Self::Resource, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::Create, self.resource_name());
        async move { Err(error) }
    }

    /// Create several resources from a JSON array payload
    fn create_resource_list(
        &self,
        _ctx: &RequestContext,
        _payloads: Vec<Payload>,
        _version: &str,
    ) -> impl Future<Output = Result<Vec<Self::Resource>, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::CreateList, self.resource_name());
        async move { Err(error) }
    }

    /// Fetch one resource by id
    fn read_resource(
        &self,
        _ctx: &RequestContext,
        _id: &str,
        _version: &str,
    ) -> impl Future<Output = Result<Self::Resource, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::Read, self.resource_name());
        async move { Err(error) }
    }

    /// Fetch a page of resources
    ///
    /// `cursor` is empty for the first page. Return an empty cursor in the
    /// [`ResourceList`] when there is nothing more to read.
    fn read_resource_list(
        &self,
        _ctx: &RequestContext,
        _limit: usize,
        _cursor: &str,
        _version: &str,
    ) -> impl Future<Output = Result<ResourceList<Self::Resource>, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::ReadList, self.resource_name());
        async move { Err(error) }
    }

    /// Replace one resource by id
    fn update_resource(
        &self,
        _ctx: &RequestContext,
        _id: &str,
        _payload: Payload,
        _version: &str,
    ) -> impl Future<Output = Result<Self::Resource, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::Update, self.resource_name());
        async move { Err(error) }
    }

    /// Update several resources from a JSON array payload
    fn update_resource_list(
        &self,
        _ctx: &RequestContext,
        _payloads: Vec<Payload>,
        _version: &str,
    ) -> impl Future<Output = Result<Vec<Self::Resource>, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::UpdateList, self.resource_name());
        async move { Err(error) }
    }

    /// Delete one resource by id, returning its final representation
    fn delete_resource(
        &self,
        _ctx: &RequestContext,
        _id: &str,
        _version: &str,
    ) -> impl Future<Output = Result<Self::Resource, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::Delete, self.resource_name());
        async move { Err(error) }
    }

    /// Delete a page of resources
    fn delete_resource_list(
        &self,
        _ctx: &RequestContext,
        _limit: usize,
        _cursor: &str,
        _version: &str,
    ) -> impl Future<Output = Result<ResourceList<Self::Resource>, ApiError>> + Send {
        let error = ApiError::method_not_allowed(ApiOperation::DeleteList, self.resource_name());
        async move { Err(error) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ApiErrorKind;

    #[derive(Serialize)]
    struct Thing;

    struct Bare;

    impl ResourceHandler for Bare {
        type Resource = Thing;

        fn resource_name(&self) -> &str {
            "thing"
        }
    }

    #[tokio::test]
    async fn test_defaults_answer_method_not_allowed() {
        let handler = Bare;
        let ctx = RequestContext::new("1");

        let err = handler
            .create_resource(&ctx, Payload::default(), "1")
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind, ApiErrorKind::MethodNotAllowed);
        assert_eq!(err.operation, ApiOperation::Create);
        assert_eq!(err.resource.as_deref(), Some("thing"));

        let err = handler.read_resource(&ctx, "1", "1").await.err().unwrap();
        assert_eq!(err.operation, ApiOperation::Read);

        let err = handler.read_resource_list(&ctx, 10, "", "1").await.err().unwrap();
        assert_eq!(err.operation, ApiOperation::ReadList);

        let err = handler
            .update_resource(&ctx, "1", Payload::default(), "1")
            .await
            .err()
            .unwrap();
        assert_eq!(err.operation, ApiOperation::Update);

        let err = handler.delete_resource(&ctx, "1", "1").await.err().unwrap();
        assert_eq!(err.operation, ApiOperation::Delete);

        let err = handler.create_resource_list(&ctx, vec![], "1").await.err().unwrap();
        assert_eq!(err.operation, ApiOperation::CreateList);

        let err = handler.update_resource_list(&ctx, vec![], "1").await.err().unwrap();
        assert_eq!(err.operation, ApiOperation::UpdateList);

        let err = handler.delete_resource_list(&ctx, 10, "", "1").await.err().unwrap();
        assert_eq!(err.operation, ApiOperation::DeleteList);
    }

    #[test]
    fn test_default_auth_and_versions() {
        let handler = Bare;
        assert!(handler.authenticate(&HeaderMap::new()).is_ok());
        assert!(handler.valid_versions().is_none());
    }
}
