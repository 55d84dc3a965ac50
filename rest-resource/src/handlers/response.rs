//! Response types for resource handlers
//!
//! Successful requests are wrapped in an [`Envelope`]:
//!
//! ```json
//! {"success": true, "status": 200, "result": [...], "next": "abc"}
//! ```
//!
//! `next` is present only when there is another page, `messages` only when the
//! handler attached some.
//!
//! ```rust
//! use rest_resource::handlers::{Envelope, ResourceList};
//!
//! let page = ResourceList::new(vec![1, 2, 3], "cursor-2");
//! assert!(page.has_more());
//!
//! let envelope = Envelope::ok(page.resources).with_next(page.cursor);
//! assert_eq!(envelope.next(), Some("cursor-2"));
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// One page of resources plus the cursor for the next page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceList<T> {
    pub resources: Vec<T>,
    /// Empty when there are no further pages
    pub cursor: String,
}

impl<T> ResourceList<T> {
    pub fn new(resources: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            resources,
            cursor: cursor.into(),
        }
    }

    /// A page with nothing after it
    pub fn last_page(resources: Vec<T>) -> Self {
        Self::new(resources, String::new())
    }

    pub fn has_more(&self) -> bool {
        !self.cursor.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Success envelope returned by every resource route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    success: bool,
    status: u16,
    result: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    messages: Vec<String>,
}

impl<T> Envelope<T> {
    /// 200 OK
    pub fn ok(result: T) -> Self {
        Self::with_status(StatusCode::OK, result)
    }

    /// 201 Created
    pub fn created(result: T) -> Self {
        Self::with_status(StatusCode::CREATED, result)
    }

    pub fn with_status(status: StatusCode, result: T) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            result,
            next: None,
            messages: Vec::new(),
        }
    }

    /// Set the next-page cursor; an empty cursor is omitted
    #[must_use]
    pub fn with_next(mut self, cursor: impl Into<String>) -> Self {
        let cursor = cursor.into();
        self.next = (!cursor.is_empty()).then_some(cursor);
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK)
    }

    pub fn result(&self) -> &T {
        &self.result
    }

    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
