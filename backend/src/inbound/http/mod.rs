//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod activities;
pub mod health;
pub mod response;

pub use response::{
    ErrorBody, ResponseEnvelope, error_response, success_response, success_response_with_status,
};

/// Register every HTTP route and the JSON envelope plumbing.
///
/// The caller supplies shared state such as
/// [`health::HealthState`] through `App::app_data`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::{configure, health::HealthState};
///
/// let _app = App::new()
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(response::json_error_handler))
        .service(web::scope("/api/v1").service(activities::validate_activity))
        .service(health::ready)
        .service(health::live)
        .default_service(web::to(response::route_not_found));
}
