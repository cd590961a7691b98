//! Activity submission endpoint.
//!
//! ```text
//! POST /api/v1/activities/validate
//! ```

use actix_web::{HttpResponse, post, web};
use serde_json::Value;

use crate::domain::{ActivitySubmission, AppResult};
use crate::inbound::http::response::{ErrorBody, success_response};

/// Validate an activity submission and echo its normalised form.
#[utoipa::path(
    post,
    path = "/api/v1/activities/validate",
    responses(
        (status = 200, description = "Submission is valid; returned as the `data` member of a success envelope", body = ActivitySubmission),
        (status = 400, description = "Submission failed validation; returned as the `error` member of a failure envelope", body = ErrorBody),
        (status = 500, description = "Unexpected failure", body = ErrorBody)
    ),
    tags = ["activities"]
)]
#[post("/activities/validate")]
pub async fn validate_activity(payload: web::Json<Value>) -> AppResult<HttpResponse> {
    let submission = ActivitySubmission::from_payload(&payload)?;
    Ok(success_response(submission))
}
