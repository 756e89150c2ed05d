use axum::{routing::get, Router};

pub mod system;

/// Router for endpoints that run inside a security context.
pub fn router() -> Router {
    Router::new().route("/audit/context", get(system::audit_context))
}
