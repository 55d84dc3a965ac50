//! Identifiers: typed request IDs and entity ID generation
//!
//! Request IDs follow the [TypeID Specification](https://github.com/jetpack-io/typeid/blob/main/spec/SPEC.md)
//! with a `req` prefix and a UUIDv7 suffix, so they sort by time:
//!
//! ```rust
//! use rest_resource::ids::RequestId;
//!
//! let request_id = RequestId::new();
//! assert!(request_id.as_str().starts_with("req_"));
//! ```
//!
//! Entity IDs come from an [`IdGenerator`] handed to the resource handler, so
//! tests can swap the random source for a deterministic one.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use http::Request;
use mti::prelude::*;
use rand::Rng;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// A type-safe request identifier for log correlation.
///
/// Format: `req_<base32-encoded-uuidv7>`, e.g. `req_01h455vb4pex5vsknk084sn02q`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7 (time-sortable).
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the prefix portion of the ID.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.prefix().as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// `MakeRequestId` for tower-http's `SetRequestIdLayer`, producing [`RequestId`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}

/// Source of identifiers for newly created entities
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier. Values are non-negative.
    fn next_id(&self) -> i64;
}

/// Random non-negative identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> i64 {
        rand::rng().random_range(0..=i64::MAX)
    }
}

/// Monotonic identifiers starting at a fixed value
///
/// The counter stops at `i64::MAX` and keeps returning it.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    /// Start counting at `start`; negative starts are raised to 0
    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start.max(0)),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> i64 {
        match self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
        {
            Ok(id) | Err(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_new() {
        let id = RequestId::new();
        assert!(id.as_str().starts_with("req_"));
        assert_eq!(id.prefix(), "req");
        // prefix (3) + underscore (1) + suffix (26)
        assert_eq!(id.as_str().len(), 30);
    }

    #[test]
    fn test_make_typed_request_id() {
        let mut maker = MakeTypedRequestId;
        let request = http::Request::builder().body(()).unwrap();

        let header_value = maker.make_request_id(&request).unwrap().into_header_value();
        assert!(header_value.to_str().unwrap().starts_with("req_"));
    }

    #[test]
    fn test_random_ids_are_non_negative() {
        let generator = RandomIdGenerator;
        for _ in 0..100 {
            assert!(generator.next_id() >= 0);
        }
    }

    #[test]
    fn test_sequential_ids() {
        let generator = SequentialIdGenerator::starting_at(7);
        assert_eq!(generator.next_id(), 7);
        assert_eq!(generator.next_id(), 8);
        assert_eq!(SequentialIdGenerator::default().next_id(), 1);
    }

    #[test]
    fn test_sequential_ids_stay_non_negative() {
        let generator = SequentialIdGenerator::starting_at(i64::MAX - 1);
        assert_eq!(generator.next_id(), i64::MAX - 1);
        assert_eq!(generator.next_id(), i64::MAX);
        assert_eq!(generator.next_id(), i64::MAX);

        assert_eq!(SequentialIdGenerator::starting_at(-5).next_id(), 0);
    }
}
