use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use eyesante_auth::{Authentication, JwtValidator, security_context};

use crate::app::errors::json_error;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the caller and run the rest of the request inside its security
/// context.
///
/// No `Authorization` header means anonymous. A header that is present but not
/// a valid bearer token is rejected.
pub async fn auth_middleware(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let auth = match authenticate(&state, req.headers()) {
        Ok(auth) => auth,
        Err(message) => {
            tracing::debug!(%message, "rejected credentials");
            return json_error(StatusCode::UNAUTHORIZED, "unauthorized", message);
        }
    };

    req.extensions_mut().insert(auth.clone());
    security_context::scope(auth, next.run(req)).await
}

fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<Authentication, String> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(Authentication::Anonymous);
    };

    let header = header
        .to_str()
        .map_err(|_| "authorization header is not valid text".to_string())?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| "expected a Bearer token".to_string())?
        .trim();
    if token.is_empty() {
        return Err("empty bearer token".to_string());
    }

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| e.to_string())?;
    Ok(claims.into_authentication())
}
