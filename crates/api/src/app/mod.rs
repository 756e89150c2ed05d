//! HTTP application wiring (Axum router).
//!
//! - `routes/`: HTTP handlers
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use eyesante_auth::JwtValidator;

use crate::context::AppContext;
use crate::lifecycle::Lifecycle;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (used by the bootstrap and by tests).
pub fn build_app(ctx: AppContext, jwt: Arc<dyn JwtValidator>, lifecycle: Lifecycle) -> Router {
    let auth_state = middleware::AuthState { jwt };

    // Audited routes: the caller's security context is in scope for the handler.
    let audited = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(ctx)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(audited)
        .layer(Extension(lifecycle))
}
