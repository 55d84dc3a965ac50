//! API error types for resource handler operations
//!
//! Handlers return [`ApiError`] values; the framework turns them into an HTTP
//! status and an error envelope via `IntoResponse`.
//!
//! # Example
//!
//! ```rust
//! use rest_resource::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("foo", "7");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.message, "No resource with id 7");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::payload::PayloadError;

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Creating a single resource
    Create,
    /// Creating a batch of resources
    CreateList,
    /// Reading one resource by id
    Read,
    /// Reading a page of resources
    ReadList,
    /// Updating one resource by id
    Update,
    /// Updating a batch of resources
    UpdateList,
    /// Deleting one resource by id
    Delete,
    /// Deleting a page of resources
    DeleteList,
    /// Authenticating the request
    Authenticate,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::CreateList => write!(f, "create_list"),
            Self::Read => write!(f, "read"),
            Self::ReadList => write!(f, "read_list"),
            Self::Update => write!(f, "update"),
            Self::UpdateList => write!(f, "update_list"),
            Self::Delete => write!(f, "delete"),
            Self::DeleteList => write!(f, "delete_list"),
            Self::Authenticate => write!(f, "authenticate"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Resource was not found
    NotFound,
    /// Authentication failed or missing
    Unauthorized,
    /// Access denied
    Forbidden,
    /// Invalid request format or parameters
    BadRequest,
    /// The resource does not support this operation
    MethodNotAllowed,
    /// Operation conflicts with current state
    Conflict,
    /// Request validation failed
    ValidationFailed,
    /// Internal server error
    InternalError,
    /// Operation not implemented
    NotImplemented,
    /// Service temporarily unavailable
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::MethodNotAllowed => write!(f, "method_not_allowed"),
            Self::Conflict => write!(f, "conflict"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::InternalError => write!(f, "internal_error"),
            Self::NotImplemented => write!(f, "not_implemented"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }

    /// Whether this kind is the server's fault
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::InternalError | Self::NotImplemented | Self::ServiceUnavailable
        )
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message, returned to the client as `reason`
    pub message: String,
    /// The resource name involved (e.g. "foo")
    pub resource: Option<String>,
    /// The id of the resource involved
    pub resource_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            resource: None,
            resource_id: None,
        }
    }

    /// Unknown resource id on a read
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            operation: ApiOperation::Read,
            kind: ApiErrorKind::NotFound,
            message: format!("No resource with id {}", id),
            resource: Some(resource.into()),
            resource_id: Some(id),
        }
    }

    /// Missing or rejected credentials
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Authenticate, ApiErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Authenticate, ApiErrorKind::Forbidden, message)
    }

    pub fn bad_request(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::BadRequest, message)
    }

    /// The handler does not implement this operation
    pub fn method_not_allowed(operation: ApiOperation, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            operation,
            kind: ApiErrorKind::MethodNotAllowed,
            message: format!("Operation {} is not supported by resource {}", operation, resource),
            resource: Some(resource),
            resource_id: None,
        }
    }

    pub fn conflict(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Conflict, message)
    }

    pub fn validation_failed(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::ValidationFailed, message)
    }

    pub fn internal(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::InternalError, message)
    }

    pub fn not_implemented(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::NotImplemented, message)
    }

    pub fn service_unavailable(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::ServiceUnavailable, message)
    }

    /// Add resource context to an existing error
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    #[must_use]
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Transient errors that may succeed on retry
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref resource) = self.resource {
            match self.resource_id {
                Some(ref id) => write!(f, " [{}: {}]", resource, id)?,
                None => write!(f, " [{}]", resource)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Payload problems are the client's fault. The operation defaults to
/// `Create`; callers on other paths adjust it with [`ApiError::with_operation`].
impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        Self::bad_request(ApiOperation::Create, err.to_string())
    }
}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub status: u16,
    pub reason: String,
    pub code: String,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if self.kind.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                resource = ?self.resource,
                resource_id = ?self.resource_id,
                retriable = self.is_retriable(),
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                resource = ?self.resource,
                resource_id = ?self.resource_id,
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            success: false,
            status: status.as_u16(),
            reason: self.message,
            code,
            operation: self.operation.to_string(),
            resource: self.resource,
            resource_id: self.resource_id,
        };

        (status, Json(response)).into_response()
    }
}
