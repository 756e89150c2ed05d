//! Startup hooks run once the context is built.

use crate::context::{AppContext, ProviderKey};

/// A hook run after the context is built and before the process is `RUNNING`.
///
/// Any error aborts startup.
pub trait StartupRunner: Send + Sync {
    fn name(&self) -> &str;

    /// `args` are the raw process arguments, passed through untouched.
    fn run(&self, ctx: &AppContext, args: &[String]) -> anyhow::Result<()>;
}

/// Logs which collaborators the auditing feature was wired with.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditingReport;

impl StartupRunner for AuditingReport {
    fn name(&self) -> &str {
        "auditing-report"
    }

    fn run(&self, ctx: &AppContext, args: &[String]) -> anyhow::Result<()> {
        let actor = ctx
            .auditor_provider()
            .current_auditor()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        let now = ctx
            .date_time_provider()
            .now()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "<none>".to_string());

        tracing::info!(
            auditor_key = ProviderKey::AuditorProvider.as_str(),
            date_time_key = ProviderKey::DateTimeProvider.as_str(),
            startup_actor = %actor,
            startup_time = %now,
            args = args.len(),
            "auditing enabled"
        );
        Ok(())
    }
}
