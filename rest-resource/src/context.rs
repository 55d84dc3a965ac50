//! Per-request context handed to resource handlers

use std::collections::HashMap;
use std::sync::Mutex;

use axum::http::HeaderMap;

/// Ambient information about the request being served
///
/// Handlers receive it by shared reference. Everything is read-only except the
/// message list, which is returned to the client in the response envelope.
#[derive(Debug, Default)]
pub struct RequestContext {
    version: String,
    resource_id: Option<String>,
    limit: usize,
    cursor: String,
    headers: HeaderMap,
    query: HashMap<String, String>,
    request_id: Option<String>,
    messages: Mutex<Vec<String>>,
}

impl RequestContext {
    /// Create a context for the given API version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// API version without the `v` prefix (`"1"` for `/api/v1/...`)
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Path id on item routes
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Effective page size for list operations
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Pagination cursor; empty for the first page
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Query string parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Attach an informational message to the response
    pub fn add_message(&self, message: impl Into<String>) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.into());
    }

    /// Messages added so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_builder_and_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("secret"));

        let mut query = HashMap::new();
        query.insert("sort".to_string(), "name".to_string());

        let ctx = RequestContext::new("1")
            .with_resource_id("42")
            .with_limit(10)
            .with_cursor("abc")
            .with_headers(headers)
            .with_query(query)
            .with_request_id("req_01h455vb4pex5vsknk084sn02q");

        assert_eq!(ctx.version(), "1");
        assert_eq!(ctx.resource_id(), Some("42"));
        assert_eq!(ctx.limit(), 10);
        assert_eq!(ctx.cursor(), "abc");
        assert_eq!(ctx.header("authorization"), Some("secret"));
        assert_eq!(ctx.header("x-missing"), None);
        assert_eq!(ctx.query_param("sort"), Some("name"));
        assert_eq!(ctx.request_id(), Some("req_01h455vb4pex5vsknk084sn02q"));
    }

    #[test]
    fn test_messages() {
        let ctx = RequestContext::new("2");
        assert!(ctx.messages().is_empty());

        ctx.add_message("first");
        ctx.add_message(String::from("second"));
        assert_eq!(ctx.messages(), vec!["first", "second"]);
    }
}
