//! Achievement verification backend.
//!
//! Validates activity submissions, classifies failures into a closed set of
//! application errors, and shapes every HTTP response into a uniform JSON
//! envelope.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
