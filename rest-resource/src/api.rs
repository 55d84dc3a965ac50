//! API assembly: register resource handlers and serve them
//!
//! ```rust,no_run
//! use rest_resource::{api::RestApi, config::Config, foo::FooHandler};
//!
//! # async fn run() -> rest_resource::error::Result<()> {
//! let config = Config::load()?;
//! RestApi::new(config.clone())
//!     .register_resource_handler(FooHandler::new(config.auth.secret))?
//!     .serve()
//!     .await
//! # }
//! ```

use std::sync::Arc;

use axum::Router;

use crate::{
    config::Config,
    error::{Error, Result},
    handlers::{
        dispatch::{method_not_allowed, resource_router, route_not_found},
        LimitPolicy, ResourceHandler,
    },
    health::health_router,
    server::Server,
    versioning::{DeprecationInfo, DeprecationPolicy},
};

/// A set of resource handlers served under one base path
pub struct RestApi {
    config: Config,
    base_path: String,
    limits: LimitPolicy,
    routes: Router,
    resources: Vec<String>,
    deprecations: DeprecationPolicy,
}

impl RestApi {
    pub fn new(config: Config) -> Self {
        let base_path = config.api.normalized_base_path();
        let limits = LimitPolicy::new(config.api.default_limit, config.api.max_limit);

        Self {
            deprecations: DeprecationPolicy::new(base_path.clone()),
            config,
            base_path,
            limits,
            routes: Router::new(),
            resources: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalised base path (`"/api"`, or empty for root)
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Names of the registered resources, in registration order
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Mount a handler's routes under `{base}/{version}/{name}`
    ///
    /// Fails when the name is already taken or is not a single URL segment.
    pub fn register_resource_handler<H: ResourceHandler>(mut self, handler: H) -> Result<Self> {
        let name = handler.resource_name().to_string();

        if !is_valid_resource_name(&name) {
            return Err(Error::InvalidResourceName(name));
        }
        if self.resources.contains(&name) {
            return Err(Error::DuplicateResource(name));
        }

        let router = resource_router(Arc::new(handler), &self.base_path, self.limits);
        self.routes = self.routes.merge(router);

        tracing::info!(
            resource = %name,
            base_path = %self.base_path,
            "Registered resource handler"
        );
        self.resources.push(name);

        Ok(self)
    }

    /// Mark a version as deprecated; its responses carry deprecation headers
    pub fn deprecate_version(mut self, info: DeprecationInfo) -> Self {
        tracing::info!(
            version = %info.version,
            replacement = %info.replacement,
            "Deprecated API version"
        );
        self.deprecations.deprecate(info);
        self
    }

    /// Resource and health routes, without the server middleware stack
    pub fn into_router(self) -> Router {
        let router = self
            .routes
            .merge(health_router(self.config.service.name.clone(), self.resources))
            .method_not_allowed_fallback(method_not_allowed)
            .fallback(route_not_found);
        self.deprecations.apply(router)
    }

    /// Routes wrapped in the full middleware stack, as served by [`RestApi::serve`]
    pub fn into_app(self) -> Router {
        let server = Server::new(self.config.clone());
        server.apply_middleware(self.into_router())
    }

    /// Bind the configured port and serve until shutdown
    pub async fn serve(self) -> Result<()> {
        let server = Server::new(self.config.clone());
        server.serve(self.into_router()).await
    }
}

fn is_valid_resource_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versioning::ApiVersion;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Empty;

    struct Named(&'static str);

    impl ResourceHandler for Named {
        type Resource = Empty;

        fn resource_name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_register_tracks_names() {
        let api = RestApi::new(Config::default())
            .register_resource_handler(Named("foo"))
            .unwrap()
            .register_resource_handler(Named("bar"))
            .unwrap();
        assert_eq!(api.resources(), ["foo", "bar"]);
        assert_eq!(api.base_path(), "/api");
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = RestApi::new(Config::default())
            .register_resource_handler(Named("foo"))
            .unwrap()
            .register_resource_handler(Named("foo"));
        assert!(matches!(result, Err(Error::DuplicateResource(name)) if name == "foo"));
    }

    #[test]
    fn test_invalid_names_rejected() {
        for bad in ["", "a/b", "with space", "{id}"] {
            let result = RestApi::new(Config::default()).register_resource_handler(Named(bad));
            assert!(matches!(result, Err(Error::InvalidResourceName(_))), "{:?}", bad);
        }
    }

    #[test]
    fn test_root_base_path() {
        let mut config = Config::default();
        config.api.base_path = "/".to_string();
        let api = RestApi::new(config)
            .deprecate_version(DeprecationInfo::new(
                ApiVersion::parse("v1").unwrap(),
                ApiVersion::parse("v2").unwrap(),
            ));
        assert_eq!(api.base_path(), "");
        let _router = api.into_router();
    }
}
