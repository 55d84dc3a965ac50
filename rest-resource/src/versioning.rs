//! API versioning: path-segment parsing and deprecation headers
//!
//! Every resource route carries its version as a path segment right after the
//! base path: `/api/v1/foo`, `/api/v2/foo/42`. The segment must start with `v`
//! (or `V`); handlers see the remainder (`"1"`, `"2"`, `"1.1"`).
//!
//! Versions can be marked deprecated at the API level, in which case every
//! response served under that version carries `Deprecation`, `Sunset`, `Link`
//! and optionally `Warning` headers.
//!
//! ```rust
//! use rest_resource::versioning::ApiVersion;
//!
//! let version = ApiVersion::parse("v2").unwrap();
//! assert_eq!(version.as_str(), "2");
//! assert_eq!(version.to_string(), "v2");
//! assert!(ApiVersion::parse("2").is_none());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    Router,
};
use serde::{Deserialize, Serialize};

/// API version identifier taken from a `v<version>` path segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Parse a path segment such as `v1`, `V2` or `v1.1`
    pub fn parse(segment: &str) -> Option<Self> {
        let rest = segment
            .strip_prefix('v')
            .or_else(|| segment.strip_prefix('V'))?;

        let valid = !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');

        valid.then(|| Self(rest.to_string()))
    }

    /// Version without the prefix (`"1"`)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Version as a path segment (`"v1"`)
    pub fn as_path_segment(&self) -> String {
        format!("v{}", self.0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Extract the version from a request path under `base_path`
///
/// `base_path` is normalised (leading slash, no trailing slash, empty for root).
pub fn extract_version_from_path(path: &str, base_path: &str) -> Option<ApiVersion> {
    let rest = path.strip_prefix(base_path)?;
    let rest = rest.strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    ApiVersion::parse(segment)
}

/// Deprecation information for an API version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeprecationInfo {
    /// The deprecated API version
    pub version: ApiVersion,
    /// The recommended replacement version
    pub replacement: ApiVersion,
    /// Sunset date in RFC 3339 format (when the version will be removed)
    pub sunset_date: Option<String>,
    /// Optional deprecation message
    pub message: Option<String>,
}

impl DeprecationInfo {
    pub fn new(version: ApiVersion, replacement: ApiVersion) -> Self {
        Self {
            version,
            replacement,
            sunset_date: None,
            message: None,
        }
    }

    /// Set the sunset date (RFC 3339 format)
    pub fn with_sunset_date(mut self, date: impl Into<String>) -> Self {
        self.sunset_date = Some(date.into());
        self
    }

    /// Set a custom deprecation message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn deprecation_header(&self) -> String {
        format!("version=\"{}\"", self.version)
    }

    fn sunset_header(&self) -> Option<String> {
        self.sunset_date.clone()
    }

    fn link_header(&self, base_path: &str) -> String {
        format!(
            "<{}/{}/>; rel=\"successor-version\"",
            base_path,
            self.replacement.as_path_segment()
        )
    }

    fn warning_header(&self) -> Option<String> {
        self.message.as_ref().map(|message| {
            format!(
                "299 - \"API version {} is deprecated. Please migrate to version {}. {}\"",
                self.version, self.replacement, message
            )
        })
    }
}

/// Deprecated versions of an API, applied as a response-header middleware
#[derive(Debug, Clone, Default)]
pub struct DeprecationPolicy {
    base_path: String,
    entries: HashMap<ApiVersion, DeprecationInfo>,
}

impl DeprecationPolicy {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            entries: HashMap::new(),
        }
    }

    /// Register a deprecated version (replaces an earlier entry for the same version)
    pub fn deprecate(&mut self, info: DeprecationInfo) {
        self.entries.insert(info.version.clone(), info);
    }

    pub fn is_deprecated(&self, version: &ApiVersion) -> bool {
        self.entries.contains_key(version)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, path: &str) -> Option<&DeprecationInfo> {
        let version = extract_version_from_path(path, &self.base_path)?;
        self.entries.get(&version)
    }

    /// Wrap a router so responses under deprecated versions carry the headers
    pub fn apply(self, router: Router) -> Router {
        if self.entries.is_empty() {
            return router;
        }

        let policy = Arc::new(self);
        router.layer(middleware::from_fn(move |req: Request, next: Next| {
            let policy = Arc::clone(&policy);
            async move {
                let deprecation = policy.lookup(req.uri().path()).cloned();
                let mut response = next.run(req).await;

                let Some(deprecation) = deprecation else {
                    return response;
                };
                let headers = response.headers_mut();

                // RFC 8594
                if let Ok(value) = HeaderValue::from_str(&deprecation.deprecation_header()) {
                    headers.insert("Deprecation", value);
                }

                if let Some(sunset) = deprecation.sunset_header() {
                    if let Ok(value) = HeaderValue::from_str(&sunset) {
                        headers.insert("Sunset", value);
                    }
                }

                if let Ok(value) =
                    HeaderValue::from_str(&deprecation.link_header(&policy.base_path))
                {
                    headers.insert(header::LINK, value);
                }

                if let Some(warning) = deprecation.warning_header() {
                    if let Ok(value) = HeaderValue::from_str(&warning) {
                        headers.insert(header::WARNING, value);
                    }
                }

                response
            }
        }))
    }
}
