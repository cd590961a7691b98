//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] describes the activity validation endpoint, the health probes,
//! and the schemas carried inside response envelopes.

use crate::domain::{ActivitySubmission, ActivityType, ErrorKind, VerificationStatus};
use crate::inbound::http::ErrorBody;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Achievement verification API",
        description = "Activity validation with uniform JSON envelopes, plus health probes.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::activities::validate_activity,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ActivitySubmission,
        ActivityType,
        VerificationStatus,
        ErrorBody,
        ErrorKind
    )),
    tags(
        (name = "activities", description = "Activity submission checks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
