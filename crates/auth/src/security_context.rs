//! Per-task security context and the auditor that reads it.
//!
//! The authentication of the current request lives in a tokio task-local, so
//! it is scoped to the future that handles the request and never leaks into
//! other tasks.

use std::future::Future;

use eyesante_core::{ActorIdentity, AuditorProvider};

use crate::Authentication;

tokio::task_local! {
    static CURRENT: Authentication;
}

/// Run `fut` with `auth` as its security context.
pub async fn scope<F>(auth: Authentication, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT.scope(auth, fut).await
}

/// Run `f` synchronously with `auth` as the security context.
pub fn sync_scope<R>(auth: Authentication, f: impl FnOnce() -> R) -> R {
    CURRENT.sync_scope(auth, f)
}

/// Authentication of the current task, if any was set.
pub fn current() -> Option<Authentication> {
    CURRENT.try_with(|auth| auth.clone()).ok()
}

/// Auditor backed by the current task's security context.
///
/// Yields the authenticated username, or the system actor when the task has
/// no context or is anonymous.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecurityContextAuditor;

impl AuditorProvider for SecurityContextAuditor {
    fn current_auditor(&self) -> Option<ActorIdentity> {
        let actor = CURRENT
            .try_with(Authentication::actor)
            .unwrap_or_else(|_| ActorIdentity::system());
        Some(actor)
    }
}
