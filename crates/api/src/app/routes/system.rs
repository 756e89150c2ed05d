use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use eyesante_auth::Authentication;
use eyesante_core::AuditStamp;

use crate::app::dto::{AuditContextResponse, HealthResponse};
use crate::context::AppContext;
use crate::lifecycle::{Lifecycle, LifecycleState};

pub async fn health(Extension(lifecycle): Extension<Lifecycle>) -> impl IntoResponse {
    let state = lifecycle.state();
    let status = if state == LifecycleState::Running {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse::from_state(state)))
}

pub async fn audit_context(
    Extension(ctx): Extension<AppContext>,
    Extension(auth): Extension<Authentication>,
) -> impl IntoResponse {
    let mut stamp = AuditStamp::default();
    ctx.auditing().mark_created(&mut stamp);

    Json(AuditContextResponse::from_stamp(&stamp, &auth))
}
