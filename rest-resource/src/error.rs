//! Framework error type

use thiserror::Error;

/// Result type alias using the framework error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the framework
///
/// Handler-level failures use [`crate::handlers::ApiError`]; this type covers
/// startup, configuration and registration.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error (binding the listener, serving)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A resource handler was registered twice under the same name
    #[error("Resource '{0}' is already registered")]
    DuplicateResource(String),

    /// A resource name that cannot be used as a URL path segment
    #[error("Invalid resource name '{0}'")]
    InvalidResourceName(String),
}

// Manual From implementation for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
