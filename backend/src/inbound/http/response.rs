//! JSON response envelopes.
//!
//! Every HTTP response body produced by the service is a
//! [`ResponseEnvelope`]: `{"success": true, "data": ...}` on success or
//! `{"success": false, "error": {...}}` on failure. This module is the only
//! place that turns an error into a response. Recognised [`AppError`]s are
//! rendered as-is; anything else is logged and replaced by a fixed internal
//! error so fault details never reach the client.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{AppError, AppResult};
use crate::middleware::TraceId;

/// Code reported for failures that are not application errors.
pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_ERROR";
/// Message reported for failures that are not application errors.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";
/// Code reported by failing health probes.
pub const SERVICE_UNAVAILABLE_CODE: &str = "SERVICE_UNAVAILABLE";

const INTERNAL_ERROR_BODY: &str = r#"{"success":false,"error":{"code":"INTERNAL_ERROR","message":"An unexpected error occurred"}}"#;

/// Error member of a failed [`ResponseEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "VALIDATION_ERROR")]
    code: String,
    #[schema(example = "Missing required field: user_id")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    details: Option<Value>,
}

impl ErrorBody {
    /// Generic body substituted for unrecognised failures.
    pub fn internal() -> Self {
        Self {
            code: INTERNAL_ERROR_CODE.to_owned(),
            message: INTERNAL_ERROR_MESSAGE.to_owned(),
            details: None,
        }
    }

    /// Body reported by a failing health probe.
    pub(crate) fn unavailable(message: &str) -> Self {
        Self {
            code: SERVICE_UNAVAILABLE_CODE.to_owned(),
            message: message.to_owned(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary details, if any.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl From<&AppError> for ErrorBody {
    fn from(value: &AppError) -> Self {
        Self {
            code: value.code().to_owned(),
            message: value.message().to_owned(),
            details: value.details().cloned(),
        }
    }
}

/// Uniform response wrapper.
///
/// ## Invariants
/// - `data` is present exactly when `success` is true.
/// - `error` is present exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

impl<T> ResponseEnvelope<T> {
    /// Successful envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope carrying `error`.
    pub fn failure(error: ErrorBody) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Whether the request succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Success payload.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Failure payload.
    pub fn error(&self) -> Option<&ErrorBody> {
        self.error.as_ref()
    }
}

/// Render any error as a failure envelope.
///
/// [`AppError`]s keep their status, code, message, and details. Other errors
/// are logged with the request trace identifier and answered with a 500
/// carrying only [`INTERNAL_ERROR_MESSAGE`].
pub fn error_response(err: &(dyn std::error::Error + 'static)) -> HttpResponse {
    if let Some(app_error) = err.downcast_ref::<AppError>() {
        return app_error_response(app_error);
    }

    match TraceId::current() {
        Some(trace_id) => error!(error = %err, %trace_id, "unexpected error"),
        None => error!(error = %err, "unexpected error"),
    }
    internal_error_response()
}

/// Render `data` as a success envelope with status 200.
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    success_response_with_status(data, StatusCode::OK)
}

/// Render `data` as a success envelope with the given status.
pub fn success_response_with_status<T: Serialize>(data: T, status: StatusCode) -> HttpResponse {
    match serde_json::to_string(&ResponseEnvelope::success(data)) {
        Ok(body) => json_response(status, body),
        Err(err) => error_response(&err),
    }
}

fn app_error_response(err: &AppError) -> HttpResponse {
    let envelope = ResponseEnvelope::<()>::failure(ErrorBody::from(err));
    match serde_json::to_string(&envelope) {
        Ok(body) => json_response(app_status(err), body),
        Err(serialise_error) => {
            error!(error = %serialise_error, code = err.code(), "failed to serialise error envelope");
            internal_error_response()
        }
    }
}

fn internal_error_response() -> HttpResponse {
    json_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY.to_owned())
}

fn json_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::json())
        .body(body)
}

fn app_status(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        app_status(self)
    }

    fn error_response(&self) -> HttpResponse {
        app_error_response(self)
    }
}

/// Turn JSON extractor failures into validation envelopes.
///
/// Oversized bodies and non-JSON content types get their own messages; every
/// other extractor failure is reported as invalid JSON.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::OverflowKnownLength { limit, .. }
        | JsonPayloadError::Overflow { limit } => {
            format!("Request body exceeds the {limit} byte limit")
        }
        JsonPayloadError::ContentType => {
            "Request body must be sent as application/json".to_owned()
        }
        _ => "Request body must be valid JSON".to_owned(),
    };
    AppError::validation(message)
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

/// Fallback for unmatched routes.
///
/// # Errors
/// Always returns a `NOT_FOUND` error.
pub async fn route_not_found() -> AppResult<HttpResponse> {
    Err(AppError::not_found("Route"))
}
