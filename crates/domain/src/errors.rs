//! Error types used throughout the client
//!
//! Every failed operation ends in exactly one [`ApiError`]. The error carries
//! a shared base (message, HTTP status, machine-readable code, wrapped cause)
//! and an [`ErrorKind`] tag holding the kind-specific context. Callers match
//! on [`ApiError::kind`] instead of downcasting.
//!
//! Construction-time problems (bad credentials, unreadable config files) are
//! reported separately through [`ConfigError`] and never surface from a
//! request.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rate-limit snapshot reported by the server alongside a 429.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Seconds the server asked us to wait (`retry-after`)
    pub retry_after: Option<u64>,
    /// Request allowance for the current window (`x-ratelimit-limit`)
    pub limit: Option<u64>,
    /// Requests left in the current window (`x-ratelimit-remaining`)
    pub remaining: Option<u64>,
    /// When the window resets (`x-ratelimit-reset`)
    pub reset: Option<DateTime<Utc>>,
}

/// Quota details attached to a quota-flagged 429 body, when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaInfo {
    pub quota_limit: Option<u64>,
    pub quota_used: Option<u64>,
    pub quota_reset: Option<DateTime<Utc>>,
}

/// Closed set of failure kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP 401/403, or a failed OAuth2 token exchange
    Authentication,
    /// HTTP 404 for a lookup
    NotFound {
        /// Display label of the resource, e.g. `"NDC"`
        resource_type: String,
        /// The identifier that was looked up, percent-decoded
        identifier: String,
    },
    /// HTTP 400/422 and other non-retryable 4xx responses
    Validation { field: Option<String> },
    /// HTTP 429 without a quota marker
    RateLimit(RateLimitInfo),
    /// HTTP 429 whose body carries the quota discriminator
    QuotaExceeded(QuotaInfo),
    /// HTTP 5xx after retries, or an undecodable success body
    Server,
    /// Transport failure after retries
    Network,
    /// No response within the configured timeout
    Timeout { timeout: Duration },
}

impl ErrorKind {
    /// Stable label suitable for logging and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::NotFound { .. } => "not_found",
            Self::Validation { .. } => "validation",
            Self::RateLimit(_) => "rate_limit",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::Server => "server",
            Self::Network => "network",
            Self::Timeout { .. } => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured failure returned by every client operation.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    code: Option<String>,
    #[source]
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl ApiError {
    /// Create an error of the given kind with no status or code.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), status: None, code: None, source: None }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn not_found(
        message: impl Into<String>,
        resource_type: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorKind::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
            },
            message,
        )
    }

    pub fn validation(message: impl Into<String>, field: Option<String>) -> Self {
        Self::new(ErrorKind::Validation { field }, message)
    }

    pub fn rate_limited(message: impl Into<String>, info: RateLimitInfo) -> Self {
        Self::new(ErrorKind::RateLimit(info), message)
    }

    pub fn quota_exceeded(message: impl Into<String>, info: QuotaInfo) -> Self {
        Self::new(ErrorKind::QuotaExceeded(info), message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Timeout error carrying the configured request timeout.
    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout { timeout },
            format!("no response within {} ms", timeout.as_millis()),
        )
    }

    /// Attach the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the machine-readable error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach an optional machine-readable error code.
    #[must_use]
    pub fn with_code_opt(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// Wrap the underlying cause.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Seconds the server asked us to wait, for rate-limit errors.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        match &self.kind {
            ErrorKind::RateLimit(info) => info.retry_after,
            _ => None,
        }
    }

    /// Whether a caller could reasonably try the same call again later.
    ///
    /// Classification only. The request executor has already applied its own
    /// retry policy before this error was built.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RateLimit(_) | ErrorKind::Server | ErrorKind::Network | ErrorKind::Timeout { .. }
        )
    }

    /// Stable label suitable for logging and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Result type alias for client operations
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Errors raised while building a client from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no credentials configured: provide an API key or a client id and client secret")]
    MissingCredentials,

    #[error("conflicting credentials: provide either an API key or client credentials, not both")]
    ConflictingCredentials,

    #[error("incomplete client credentials: {missing} is required")]
    IncompleteClientCredentials { missing: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("no config file found in any of the standard locations")]
    NoConfigFile,

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} in {}: {reason}", path.display())]
    Parse { path: PathBuf, format: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
