//! # rest-resource
//!
//! A small framework for versioned CRUD-over-HTTP APIs. Each resource type is
//! bound to its logic through a [`ResourceHandler`](handlers::ResourceHandler);
//! the framework handles routing, authentication ordering, version checks,
//! pagination parameters, payload decoding and the JSON response envelope.
//!
//! ## Features
//!
//! - **Routing**: `/{base}/{version}/{resource}[/{id}]` for create, read, update, delete and their list forms
//! - **Versioning**: per-handler version gating and deprecation headers
//! - **Middleware stack**: request IDs, sensitive-header masking, body limits, timeouts, compression, CORS, panic recovery
//! - **Configuration**: layered figment config (defaults, TOML files, `REST_` environment variables)
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use rest_resource::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     RestApi::new(config.clone())
//!         .register_resource_handler(FooHandler::new(config.auth.secret))?
//!         .serve()
//!         .await
//! }
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod foo;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod payload;
pub mod server;
pub mod versioning;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::RestApi;
    pub use crate::config::Config;
    pub use crate::context::RequestContext;
    pub use crate::error::{Error, Result};
    pub use crate::foo::{Foo, FooHandler};
    pub use crate::handlers::{
        ApiError, ApiErrorKind, ApiOperation, Envelope, ResourceHandler, ResourceList,
    };
    pub use crate::ids::{IdGenerator, RandomIdGenerator, RequestId, SequentialIdGenerator};
    pub use crate::observability::init_tracing;
    pub use crate::payload::{Payload, PayloadError};
    pub use crate::server::Server;
    pub use crate::versioning::{ApiVersion, DeprecationInfo};
}
