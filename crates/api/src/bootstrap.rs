//! Process bootstrap: build the context, run startup hooks, start serving,
//! and stay up until told to stop.
//!
//! Every failure before `RUNNING` is fatal. Nothing is retried.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use eyesante_auth::{Hs256JwtValidator, SecurityContextAuditor};
use eyesante_core::ZonedClock;

use crate::app;
use crate::config::AppConfig;
use crate::context::{AppContext, ContainerBuilder};
use crate::error::BootstrapError;
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::runner::AuditingReport;

/// The collaborators the `eyesante` binary runs with.
pub fn default_container(config: &AppConfig) -> ContainerBuilder {
    ContainerBuilder::new()
        .auditor_provider(SecurityContextAuditor)
        .date_time_provider(ZonedClock::new(config.utc_offset))
        .startup_runner(AuditingReport)
}

/// An application that has not started yet.
pub struct Application {
    config: AppConfig,
    builder: ContainerBuilder,
    args: Vec<String>,
    lifecycle: Lifecycle,
}

impl Application {
    pub fn new(config: AppConfig, builder: ContainerBuilder) -> Self {
        Self {
            config,
            builder,
            args: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Raw process arguments handed to startup runners.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Lifecycle handle, observable before and after `start`.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    /// Build everything and start serving.
    ///
    /// On error the lifecycle ends in `STOPPED` without ever being `RUNNING`.
    pub async fn start(self) -> Result<RunningApplication, BootstrapError> {
        let lifecycle = self.lifecycle.clone();
        match self.start_inner().await {
            Ok(running) => Ok(running),
            Err(err) => {
                lifecycle.request_stop();
                log_fatal("startup", &err);
                Err(err)
            }
        }
    }

    async fn start_inner(self) -> Result<RunningApplication, BootstrapError> {
        let Self {
            config,
            builder,
            args,
            lifecycle,
        } = self;

        tracing::info!(state = %lifecycle.state(), "bootstrapping");

        let ctx = builder.build()?;

        for runner in ctx.runners() {
            tracing::debug!(runner = runner.name(), "running startup runner");
            runner.run(&ctx, &args).map_err(|source| BootstrapError::Runner {
                name: runner.name().to_string(),
                source,
            })?;
        }

        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| BootstrapError::Bind {
                addr: config.bind_addr,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| BootstrapError::Bind {
            addr: config.bind_addr,
            source,
        })?;

        let jwt = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
        let router = app::build_app(ctx.clone(), jwt, lifecycle.clone());

        lifecycle.mark_running()?;
        tracing::info!("listening on {}", local_addr);

        let server = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move {
                axum::serve(listener, router)
                    .with_graceful_shutdown(async move { lifecycle.stopped().await })
                    .await
            })
        };

        Ok(RunningApplication {
            ctx,
            lifecycle,
            local_addr,
            server,
        })
    }
}

/// A started application.
pub struct RunningApplication {
    ctx: AppContext,
    lifecycle: Lifecycle,
    local_addr: SocketAddr,
    server: JoinHandle<std::io::Result<()>>,
}

impl RunningApplication {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Ask the server to stop accepting work. In-flight requests drain.
    pub fn shutdown(&self) {
        if self.lifecycle.request_stop() {
            tracing::info!("shutdown requested");
        }
    }

    /// Wait for the server to finish. The lifecycle is `STOPPED` afterwards.
    pub async fn wait(self) -> Result<(), BootstrapError> {
        let outcome = self.server.await;
        self.lifecycle.request_stop();

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(BootstrapError::Serve(e)),
            Err(join) => Err(BootstrapError::Serve(std::io::Error::other(join))),
        }
    }

    /// Serve until Ctrl-C / SIGTERM or a programmatic shutdown.
    pub async fn run_until_shutdown(self) -> Result<(), BootstrapError> {
        let watcher = {
            let lifecycle = self.lifecycle.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = shutdown_signal() => {
                        tracing::info!("shutdown signal received");
                        lifecycle.request_stop();
                    }
                    _ = lifecycle.stopped() => {}
                }
            })
        };

        let result = self.wait().await;
        watcher.abort();
        result
    }
}

/// Blocking entry point: start, serve, stop.
pub async fn run(
    config: AppConfig,
    builder: ContainerBuilder,
    args: impl IntoIterator<Item = String>,
) -> Result<(), BootstrapError> {
    let running = Application::new(config, builder).with_args(args).start().await?;
    running
        .run_until_shutdown()
        .await
        .inspect_err(|err| log_fatal("serve", err))
}

/// Record a fatal failure in the log. `stage` is `startup` or `serve`.
pub(crate) fn log_fatal(stage: &'static str, err: &BootstrapError) {
    tracing::error!(stage, error = %err, exit_code = err.exit_code(), "{stage} failed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
