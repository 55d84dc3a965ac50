//! Resource handlers and the HTTP plumbing around them
//!
//! - [`ResourceHandler`]: the CRUD trait a resource implements
//! - [`ApiError`]: errors with automatic HTTP status mapping
//! - [`ResourceList`] and [`Envelope`]: list pages and the success envelope
//! - [`ListQuery`]: `limit` / `next` resolution for list routes
//!
//! Routing is internal; handlers are mounted through
//! [`RestApi::register_resource_handler`](crate::api::RestApi::register_resource_handler).

pub(crate) mod dispatch;
pub mod error;
pub mod query;
pub mod response;
pub mod traits;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation};
pub use query::{LimitPolicy, ListQuery, CURSOR_PARAM, DEFAULT_LIMIT, LIMIT_PARAM, MAX_LIMIT};
pub use response::{Envelope, ResourceList};
pub use traits::ResourceHandler;
