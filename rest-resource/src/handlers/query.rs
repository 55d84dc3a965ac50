//! Pagination parameters for list operations
//!
//! List routes accept `limit` (page size) and `next` (opaque cursor) query
//! parameters:
//!
//! ```rust
//! use std::collections::HashMap;
//! use rest_resource::handlers::{ApiOperation, LimitPolicy, ListQuery};
//!
//! let mut params = HashMap::new();
//! params.insert("limit".to_string(), "5000".to_string());
//! params.insert("next".to_string(), "abc".to_string());
//!
//! let query = ListQuery::from_params(&params, LimitPolicy::default(), ApiOperation::ReadList).unwrap();
//! assert_eq!(query.limit(), 1000);
//! assert_eq!(query.cursor(), "abc");
//! ```

use std::collections::HashMap;

use super::error::{ApiError, ApiOperation};

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter carrying the cursor
pub const CURSOR_PARAM: &str = "next";

/// Page size when the request does not name one
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page size a request may ask for
pub const MAX_LIMIT: usize = 1000;

/// Default and maximum page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    default_limit: usize,
    max_limit: usize,
}

impl LimitPolicy {
    /// Both values are forced to at least 1 and the default never exceeds the max
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, MAX_LIMIT)
    }
}

/// Resolved `limit` and `next` for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    limit: usize,
    cursor: String,
}

impl ListQuery {
    /// Read `limit` and `next` from query parameters
    ///
    /// A missing limit takes the policy default and an oversized one is clamped
    /// to the maximum. Non-numeric or zero limits are rejected with 400.
    pub fn from_params(
        params: &HashMap<String, String>,
        policy: LimitPolicy,
        operation: ApiOperation,
    ) -> Result<Self, ApiError> {
        let limit = match params.get(LIMIT_PARAM) {
            None => policy.default_limit,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(ApiError::bad_request(
                        operation,
                        format!("Invalid limit '{}': expected a positive integer", raw),
                    ))
                }
                Ok(n) => n.min(policy.max_limit),
            },
        };

        let cursor = params.get(CURSOR_PARAM).cloned().unwrap_or_default();

        Ok(Self { limit, cursor })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Empty for the first page
    pub fn cursor(&self) -> &str {
        &self.cursor
    }
}
