//! Liveness and readiness probes.
//!
//! Probes answer with the same envelope as every other route: a success
//! envelope while the probe passes, and a 503 `SERVICE_UNAVAILABLE` failure
//! envelope otherwise. Responses are marked `Cache-Control: no-store`.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, web};
use serde_json::json;
use tracing::error;

use super::response::{ErrorBody, ResponseEnvelope};

/// Shared probe state.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a state that is live but not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready to take traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness checks, typically while draining for shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy)]
enum Probe {
    Readiness,
    Liveness,
}

impl Probe {
    const fn passing(self) -> &'static str {
        match self {
            Self::Readiness => "ready",
            Self::Liveness => "alive",
        }
    }

    const fn failing(self) -> &'static str {
        match self {
            Self::Readiness => "Service is not ready",
            Self::Liveness => "Service is shutting down",
        }
    }

    fn respond(self, ok: bool) -> HttpResponse {
        let (status, body) = if ok {
            (
                StatusCode::OK,
                serde_json::to_value(ResponseEnvelope::success(json!({ "status": self.passing() }))),
            )
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::to_value(ResponseEnvelope::<()>::failure(ErrorBody::unavailable(
                    self.failing(),
                ))),
            )
        };

        probe_response(self, status, body)
    }
}

/// A failed serialisation still answers the probe with the right status.
fn probe_response(
    probe: Probe,
    status: StatusCode,
    body: serde_json::Result<serde_json::Value>,
) -> HttpResponse {
    let mut response = HttpResponse::build(status);
    response.insert_header((header::CACHE_CONTROL, "no-store"));
    match body {
        Ok(body) => response.json(body),
        Err(serialise_error) => {
            error!(error = %serialise_error, ?probe, "failed to serialise probe envelope");
            response.finish()
        }
    }
}

/// Readiness probe: 200 once the server accepts traffic, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready", body = ErrorBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    Probe::Readiness.respond(state.is_ready())
}

/// Liveness probe: 200 while alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down", body = ErrorBody)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    Probe::Liveness.respond(state.is_alive())
}
