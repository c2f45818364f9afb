use std::fmt;
use thiserror::Error;

/// The error type for escher operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing secret, malformed credential scope, unknown algorithm)
    InvalidConfiguration,

    /// A header required for signing or explicitly looked up is absent
    MissingHeader,

    /// A header value can't be represented as text
    InvalidHeaderValue,

    /// A date string doesn't match the expected format
    InvalidDateFormat,

    /// Request can't be verified (malformed authorization header, out of range date, unknown key)
    InvalidRequest,

    /// Unexpected errors (hash backend, formatting, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

// Convenience constructors
impl Error {
    /// Create an invalid configuration error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration, message)
    }

    /// Create a missing header error for the given header name
    pub fn missing_header(name: &str) -> Self {
        Self::new(
            ErrorKind::MissingHeader,
            format!("the {} header is missing", name.to_lowercase()),
        )
    }

    /// Create an invalid header value error for the given header name
    pub fn header_value_invalid(name: &str) -> Self {
        Self::new(
            ErrorKind::InvalidHeaderValue,
            format!("header value should be string or number [{name}]"),
        )
    }

    /// Create an invalid date format error
    pub fn date_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDateFormat, message)
    }

    /// Create an invalid request error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidConfiguration => write!(f, "invalid configuration"),
            ErrorKind::MissingHeader => write!(f, "missing header"),
            ErrorKind::InvalidHeaderValue => write!(f, "invalid header value"),
            ErrorKind::InvalidDateFormat => write!(f, "invalid date format"),
            ErrorKind::InvalidRequest => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<hmac::digest::InvalidLength> for Error {
    fn from(err: hmac::digest::InvalidLength) -> Self {
        Self::unexpected(format!("failed to initialize hmac: {err}"))
    }
}
