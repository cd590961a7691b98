//! Application error taxonomy.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; the domain only records the stable code, the status an adapter
//! should use, and the message and details a client may see.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Default message for [`ErrorKind::Authentication`].
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
/// Default message for [`ErrorKind::Authorization`].
pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";
/// Default message for [`ErrorKind::RateLimit`].
pub const RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded";

/// Closed set of recognised application failures.
///
/// Serialises as the stable machine-readable code (for example
/// `"VALIDATION_ERROR"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorKind {
    /// The request is malformed or fails validation.
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// Credentials are missing or invalid.
    #[serde(rename = "AUTHENTICATION_ERROR")]
    Authentication,
    /// The caller is authenticated but not permitted.
    #[serde(rename = "AUTHORIZATION_ERROR")]
    Authorization,
    /// The requested resource does not exist.
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// The request conflicts with existing state.
    #[serde(rename = "CONFLICT")]
    Conflict,
    /// The caller exceeded its request allowance.
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    RateLimit,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RateLimit => "RATE_LIMIT_EXCEEDED",
        }
    }

    /// HTTP status used when the error does not override it.
    pub const fn default_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Authentication => 401,
            Self::Authorization => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::RateLimit => 429,
        }
    }
}

/// Failures raised while adjusting an [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppErrorValidationError {
    /// The status lies outside the 100-599 HTTP range.
    #[error("status {0} is not a valid HTTP status code")]
    InvalidStatus(u16),
}

/// Application error payload.
///
/// ## Invariants
/// - `code()` is fixed by the kind and never changes after construction.
/// - `status()` is a conventional HTTP status (100-599).
///
/// # Examples
/// ```
/// use backend::domain::{AppError, ErrorKind};
///
/// let err = AppError::not_found("Achievement");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.code(), "NOT_FOUND");
/// assert_eq!(err.message(), "Achievement not found");
/// assert_eq!(err.status(), 404);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    status: u16,
    details: Option<Value>,
}

impl AppError {
    /// Create an error of the given kind with its default status.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.default_status(),
            details: None,
        }
    }

    /// Convenience constructor for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Convenience constructor for [`ErrorKind::Authentication`].
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication, AUTHENTICATION_REQUIRED)
    }

    /// Convenience constructor for [`ErrorKind::Authorization`].
    pub fn authorization() -> Self {
        Self::new(ErrorKind::Authorization, INSUFFICIENT_PERMISSIONS)
    }

    /// Convenience constructor for [`ErrorKind::NotFound`].
    ///
    /// The message is derived from the resource name.
    pub fn not_found(resource: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("{} not found", resource.as_ref()),
        )
    }

    /// Convenience constructor for [`ErrorKind::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Convenience constructor for [`ErrorKind::RateLimit`].
    pub fn rate_limited() -> Self {
        Self::new(ErrorKind::RateLimit, RATE_LIMIT_EXCEEDED)
    }

    /// Replace the human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::AppError;
    /// use serde_json::json;
    ///
    /// let err = AppError::validation("bad").with_details(json!({ "field": "name" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the status reported to adapters.
    ///
    /// # Errors
    /// Returns [`AppErrorValidationError::InvalidStatus`] when `status` is not
    /// within 100-599.
    pub fn try_with_status(mut self, status: u16) -> Result<Self, AppErrorValidationError> {
        if !(100..=599).contains(&status) {
            return Err(AppErrorValidationError::InvalidStatus(status));
        }
        self.status = status;
        Ok(self)
    }

    /// Error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status adapters should respond with.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Supplementary error details for clients.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

/// Convenient result alias for fallible domain operations.
pub type AppResult<T> = Result<T, AppError>;
