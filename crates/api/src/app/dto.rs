use serde::Serialize;

use eyesante_auth::Authentication;
use eyesante_core::{ActorIdentity, AuditStamp};

use crate::lifecycle::LifecycleState;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub state: &'static str,
}

impl HealthResponse {
    pub fn from_state(state: LifecycleState) -> Self {
        let status = if state == LifecycleState::Running { "UP" } else { "DOWN" };
        Self {
            status,
            state: state.as_str(),
        }
    }
}

/// What the auditing feature stamps on a record created by this request.
#[derive(Debug, Serialize)]
pub struct AuditContextResponse {
    pub auditor: String,
    pub timestamp: Option<String>,
    pub authenticated: bool,
    pub roles: Vec<String>,
}

impl AuditContextResponse {
    pub fn from_stamp(stamp: &AuditStamp, auth: &Authentication) -> Self {
        let auditor = stamp.created_by.clone().unwrap_or_else(ActorIdentity::system);
        Self {
            auditor: auditor.to_string(),
            timestamp: stamp.created_at.map(|t| t.to_rfc3339()),
            authenticated: auth.is_authenticated(),
            roles: auth.roles().iter().map(|r| r.as_str().to_string()).collect(),
        }
    }
}
