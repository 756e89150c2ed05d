//! Application context: the explicitly built set of collaborators the rest of
//! the process is handed.
//!
//! Collaborators are registered by type on [`ContainerBuilder`]; the string
//! names in [`ProviderKey`] are kept only for diagnostics and presence checks.

use std::sync::Arc;

use eyesante_core::{AuditingHandler, AuditorProvider, DateTimeProvider};

use crate::error::BootstrapError;
use crate::runner::StartupRunner;

/// Registration key of a collaborator the auditing feature depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKey {
    AuditorProvider,
    DateTimeProvider,
}

impl ProviderKey {
    /// Every key, in the order they are checked at build time.
    pub const ALL: [ProviderKey; 2] = [ProviderKey::AuditorProvider, ProviderKey::DateTimeProvider];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuditorProvider => "auditorProvider",
            Self::DateTimeProvider => "dateTimeProvider",
        }
    }
}

impl core::fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collects registrations, then builds an [`AppContext`] or refuses to.
#[derive(Default)]
pub struct ContainerBuilder {
    auditor: Option<Arc<dyn AuditorProvider>>,
    clock: Option<Arc<dyn DateTimeProvider>>,
    runners: Vec<Arc<dyn StartupRunner>>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the `auditorProvider` collaborator.
    pub fn auditor_provider(mut self, provider: impl AuditorProvider + 'static) -> Self {
        self.auditor = Some(Arc::new(provider));
        self
    }

    /// Register (or replace) the `dateTimeProvider` collaborator.
    pub fn date_time_provider(mut self, provider: impl DateTimeProvider + 'static) -> Self {
        self.clock = Some(Arc::new(provider));
        self
    }

    /// Add a hook that runs after the context is built, before `RUNNING`.
    pub fn startup_runner(mut self, runner: impl StartupRunner + 'static) -> Self {
        self.runners.push(Arc::new(runner));
        self
    }

    pub fn contains(&self, key: ProviderKey) -> bool {
        match key {
            ProviderKey::AuditorProvider => self.auditor.is_some(),
            ProviderKey::DateTimeProvider => self.clock.is_some(),
        }
    }

    /// Resolve every collaborator. The first missing key, in [`ProviderKey::ALL`]
    /// order, is reported.
    pub fn build(self) -> Result<AppContext, BootstrapError> {
        let auditor = self
            .auditor
            .ok_or(BootstrapError::MissingCollaborator(ProviderKey::AuditorProvider))?;
        let clock = self
            .clock
            .ok_or(BootstrapError::MissingCollaborator(ProviderKey::DateTimeProvider))?;

        let auditing = AuditingHandler::new(auditor.clone(), clock.clone());

        Ok(AppContext {
            inner: Arc::new(Inner {
                auditor,
                clock,
                auditing,
                runners: self.runners,
            }),
        })
    }
}

struct Inner {
    auditor: Arc<dyn AuditorProvider>,
    clock: Arc<dyn DateTimeProvider>,
    auditing: AuditingHandler,
    runners: Vec<Arc<dyn StartupRunner>>,
}

/// A collaborator resolved by key.
#[derive(Clone, Copy)]
pub enum Collaborator<'a> {
    Auditor(&'a dyn AuditorProvider),
    DateTime(&'a dyn DateTimeProvider),
}

impl Collaborator<'_> {
    pub fn key(&self) -> ProviderKey {
        match self {
            Self::Auditor(_) => ProviderKey::AuditorProvider,
            Self::DateTime(_) => ProviderKey::DateTimeProvider,
        }
    }
}

/// Fully resolved context. Cheap to clone; read-only after build.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<Inner>,
}

impl AppContext {
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn auditor_provider(&self) -> &dyn AuditorProvider {
        self.inner.auditor.as_ref()
    }

    pub fn date_time_provider(&self) -> &dyn DateTimeProvider {
        self.inner.clock.as_ref()
    }

    /// Auditing handler bound to this context's two providers.
    pub fn auditing(&self) -> &AuditingHandler {
        &self.inner.auditing
    }

    /// Look a collaborator up by its registration key.
    pub fn get(&self, key: ProviderKey) -> Collaborator<'_> {
        match key {
            ProviderKey::AuditorProvider => Collaborator::Auditor(self.auditor_provider()),
            ProviderKey::DateTimeProvider => Collaborator::DateTime(self.date_time_provider()),
        }
    }

    pub(crate) fn runners(&self) -> &[Arc<dyn StartupRunner>] {
        &self.inner.runners
    }
}

impl core::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppContext")
            .field("runners", &self.inner.runners.len())
            .finish_non_exhaustive()
    }
}
