//! Request payloads with typed field access
//!
//! A [`Payload`] is the decoded JSON object of a create or update request.
//! Handlers pull fields out by name:
//!
//! ```rust
//! use rest_resource::payload::Payload;
//! use serde_json::json;
//!
//! let payload = Payload::from_value(json!({"foobar": "hi", "count": 3})).unwrap();
//! assert_eq!(payload.get_string("foobar").unwrap(), "hi");
//! assert_eq!(payload.get_int("count").unwrap(), 3);
//! assert!(payload.get_string("missing").is_err());
//! ```

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to read a field out of a [`Payload`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The field is absent
    #[error("missing field '{0}'")]
    MissingField(String),

    /// The field exists with a different JSON type
    #[error("field '{field}' is not a {expected}")]
    WrongType {
        /// Field name
        field: String,
        /// Expected JSON type
        expected: &'static str,
    },

    /// The field is a string but not an RFC 3339 timestamp
    #[error("field '{field}' is not an RFC 3339 timestamp: {value}")]
    InvalidTime {
        /// Field name
        field: String,
        /// The rejected value
        value: String,
    },

    /// The request body was valid JSON but not an object
    #[error("payload must be a JSON object")]
    NotAnObject,

    /// The payload did not match the requested type
    #[error("payload does not match the expected shape: {0}")]
    Deserialize(String),
}

/// Decoded JSON object from a request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Wrap an existing JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a payload from any JSON value, rejecting non-objects
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(PayloadError::NotAnObject),
        }
    }

    /// Raw field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the field is present (including explicit `null`)
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Field names in the payload
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn field(&self, key: &str) -> Result<&Value, PayloadError> {
        self.0
            .get(key)
            .ok_or_else(|| PayloadError::MissingField(key.to_string()))
    }

    fn wrong_type(key: &str, expected: &'static str) -> PayloadError {
        PayloadError::WrongType {
            field: key.to_string(),
            expected,
        }
    }

    /// String field
    pub fn get_string(&self, key: &str) -> Result<&str, PayloadError> {
        self.field(key)?
            .as_str()
            .ok_or_else(|| Self::wrong_type(key, "string"))
    }

    /// Integer field. Floats with a fractional part are rejected.
    pub fn get_int(&self, key: &str) -> Result<i64, PayloadError> {
        self.field(key)?
            .as_i64()
            .ok_or_else(|| Self::wrong_type(key, "integer"))
    }

    /// Numeric field as f64 (integers are widened)
    pub fn get_float(&self, key: &str) -> Result<f64, PayloadError> {
        self.field(key)?
            .as_f64()
            .ok_or_else(|| Self::wrong_type(key, "number"))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, PayloadError> {
        self.field(key)?
            .as_bool()
            .ok_or_else(|| Self::wrong_type(key, "boolean"))
    }

    /// Array field
    pub fn get_slice(&self, key: &str) -> Result<&[Value], PayloadError> {
        self.field(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Self::wrong_type(key, "array"))
    }

    /// Array field whose elements must all be strings
    pub fn get_string_slice(&self, key: &str) -> Result<Vec<&str>, PayloadError> {
        self.get_slice(key)?
            .iter()
            .map(|v| v.as_str().ok_or_else(|| Self::wrong_type(key, "array of strings")))
            .collect()
    }

    /// Nested object field
    pub fn get_map(&self, key: &str) -> Result<Payload, PayloadError> {
        self.field(key)?
            .as_object()
            .cloned()
            .map(Payload)
            .ok_or_else(|| Self::wrong_type(key, "object"))
    }

    /// RFC 3339 timestamp field, normalised to UTC
    pub fn get_time(&self, key: &str) -> Result<DateTime<Utc>, PayloadError> {
        let raw = self
            .field(key)?
            .as_str()
            .ok_or_else(|| Self::wrong_type(key, "string"))?;

        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| PayloadError::InvalidTime {
                field: key.to_string(),
                value: raw.to_string(),
            })
    }

    /// Deserialize the whole payload into a typed struct
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, PayloadError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| PayloadError::Deserialize(e.to_string()))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
