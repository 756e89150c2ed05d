//! Service bootstrap: configuration, application context, lifecycle, and the
//! HTTP surface the process serves while running.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod runner;

pub use bootstrap::{Application, RunningApplication, default_container};
pub use config::{AppConfig, ConfigError};
pub use context::{AppContext, Collaborator, ContainerBuilder, ProviderKey};
pub use error::BootstrapError;
pub use lifecycle::{Lifecycle, LifecycleState, TransitionError};
pub use runner::{AuditingReport, StartupRunner};
