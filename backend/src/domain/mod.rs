//! Domain primitives: the application error taxonomy, request validators, and
//! activity submissions.
//!
//! Purpose: keep validation and error classification free of transport
//! concerns. Inbound adapters turn the results into HTTP envelopes.
//!
//! Public surface:
//! - AppError (alias to `error::AppError`) — recognised application failure.
//! - ErrorKind (alias to `error::ErrorKind`) — closed set of failure kinds.
//! - ActivitySubmission (alias to `activity::ActivitySubmission`) — validated
//!   activity payload.

pub mod activity;
pub mod error;
pub mod validation;

pub use self::activity::{
    ActivitySubmission, ActivityType, UnknownActivityType, VerificationStatus,
};
pub use self::error::{AppError, AppErrorValidationError, AppResult, ErrorKind};
pub use self::validation::{
    ValidationSchema, is_valid_email, is_valid_iso8601, is_valid_uuid, parse_iso8601,
    sanitize_string, validate, validate_activity_data,
};
