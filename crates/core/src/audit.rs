//! Auditing feature: stamps records with who wrote them and when.
//!
//! The handler only knows the two collaborator traits. Where the actor and the
//! time come from (security context, wall clock, fixed values in tests) is
//! decided by whoever builds the handler.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::actor::ActorIdentity;
use crate::clock::{DateTimeProvider, Timestamp};

/// Source of the acting identity for the auditing feature.
pub trait AuditorProvider: Send + Sync {
    /// Identity of the current actor, or `None` if it cannot be determined.
    fn current_auditor(&self) -> Option<ActorIdentity>;
}

impl<T: AuditorProvider + ?Sized> AuditorProvider for Arc<T> {
    fn current_auditor(&self) -> Option<ActorIdentity> {
        (**self).current_auditor()
    }
}

/// Always reports the same actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAuditor(ActorIdentity);

impl FixedAuditor {
    pub fn new(actor: ActorIdentity) -> Self {
        Self(actor)
    }

    pub fn system() -> Self {
        Self(ActorIdentity::system())
    }
}

impl AuditorProvider for FixedAuditor {
    fn current_auditor(&self) -> Option<ActorIdentity> {
        Some(self.0.clone())
    }
}

/// The four audit columns carried by every auditable record.
///
/// `created_*` are written once; `updated_*` follow every write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub created_at: Option<Timestamp>,
    pub created_by: Option<ActorIdentity>,
    pub updated_at: Option<Timestamp>,
    pub updated_by: Option<ActorIdentity>,
}

impl AuditStamp {
    pub fn is_new(&self) -> bool {
        self.created_at.is_none() && self.created_by.is_none()
    }
}

/// A record that carries an [`AuditStamp`].
pub trait Auditable {
    fn audit_stamp(&self) -> &AuditStamp;

    fn audit_stamp_mut(&mut self) -> &mut AuditStamp;
}

impl Auditable for AuditStamp {
    fn audit_stamp(&self) -> &AuditStamp {
        self
    }

    fn audit_stamp_mut(&mut self) -> &mut AuditStamp {
        self
    }
}

/// Applies audit stamps on create and update.
#[derive(Clone)]
pub struct AuditingHandler {
    auditor: Arc<dyn AuditorProvider>,
    clock: Arc<dyn DateTimeProvider>,
}

impl AuditingHandler {
    pub fn new(auditor: Arc<dyn AuditorProvider>, clock: Arc<dyn DateTimeProvider>) -> Self {
        Self { auditor, clock }
    }

    /// Stamp a record that is being persisted for the first time.
    ///
    /// Created fields that are already set are left alone.
    pub fn mark_created<T: Auditable + ?Sized>(&self, record: &mut T) {
        let actor = self.resolve_actor();
        let now = self.clock.now();
        let stamp = record.audit_stamp_mut();

        if stamp.created_by.is_none() {
            stamp.created_by = Some(actor.clone());
        }
        if stamp.created_at.is_none() {
            stamp.created_at = now;
        }

        stamp.updated_by = Some(actor);
        if now.is_some() {
            stamp.updated_at = now;
        }
    }

    /// Stamp a record that is being updated.
    pub fn mark_modified<T: Auditable + ?Sized>(&self, record: &mut T) {
        let actor = self.resolve_actor();
        let now = self.clock.now();
        let stamp = record.audit_stamp_mut();

        stamp.updated_by = Some(actor);
        if now.is_some() {
            stamp.updated_at = now;
        }
    }

    /// Stamp as created or modified depending on whether the record was ever stamped.
    pub fn mark<T: Auditable + ?Sized>(&self, record: &mut T) {
        if record.audit_stamp().is_new() {
            self.mark_created(record);
        } else {
            self.mark_modified(record);
        }
    }

    fn resolve_actor(&self) -> ActorIdentity {
        self.auditor.current_auditor().unwrap_or_else(|| {
            tracing::debug!("auditor provider returned no actor; falling back to system");
            ActorIdentity::system()
        })
    }
}

impl core::fmt::Debug for AuditingHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuditingHandler").finish_non_exhaustive()
    }
}
