use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::DateTime;
use eyesante_api::{
    AppConfig, AppContext, Application, BootstrapError, Collaborator, ContainerBuilder, LifecycleState, ProviderKey,
    StartupRunner,
};
use eyesante_auth::{Authentication, Role, SecurityContextAuditor, security_context};
use eyesante_core::{ActorIdentity, AuditStamp, FixedAuditor, FixedDateTimeProvider, Timestamp};
use eyesante_observability::LogFormat;

fn config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        jwt_secret: "bootstrap-secret".to_string(),
        utc_offset: eyesante_core::east_africa_time(),
        log_format: LogFormat::Text,
    }
}

fn new_year() -> Timestamp {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap()
}

struct CountingRunner {
    calls: Arc<AtomicUsize>,
    seen_args: Arc<std::sync::Mutex<Vec<String>>>,
}

impl StartupRunner for CountingRunner {
    fn name(&self) -> &str {
        "counting"
    }

    fn run(&self, ctx: &AppContext, args: &[String]) -> anyhow::Result<()> {
        assert!(ctx.auditor_provider().current_auditor().is_some());
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_args.lock().unwrap().extend(args.iter().cloned());
        Ok(())
    }
}

struct FailingRunner;

impl StartupRunner for FailingRunner {
    fn name(&self) -> &str {
        "seed-super-admin"
    }

    fn run(&self, _ctx: &AppContext, _args: &[String]) -> anyhow::Result<()> {
        anyhow::bail!("database unreachable")
    }
}

#[tokio::test]
async fn fixed_providers_reach_running_and_are_retrievable() {
    let builder = ContainerBuilder::new()
        .auditor_provider(FixedAuditor::new(ActorIdentity::new("system").unwrap()))
        .date_time_provider(FixedDateTimeProvider::new(new_year()));

    let app = Application::new(config(), builder).start().await.unwrap();
    assert_eq!(app.state(), LifecycleState::Running);

    let ctx = app.context();
    let Collaborator::Auditor(auditor) = ctx.get(ProviderKey::AuditorProvider) else {
        panic!("auditorProvider should resolve to the auditor");
    };
    let Collaborator::DateTime(clock) = ctx.get(ProviderKey::DateTimeProvider) else {
        panic!("dateTimeProvider should resolve to the clock");
    };
    assert_eq!(auditor.current_auditor().unwrap().as_str(), "system");
    assert_eq!(clock.now(), Some(new_year()));

    let lifecycle = app.lifecycle();
    app.shutdown();
    app.wait().await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn missing_date_time_provider_fails_fast() {
    let builder = ContainerBuilder::new().auditor_provider(FixedAuditor::system());

    let app = Application::new(config(), builder);
    let lifecycle = app.lifecycle();
    let mut states = lifecycle.subscribe();

    let err = app.start().await.err().expect("startup must fail");

    assert!(matches!(err, BootstrapError::MissingCollaborator(ProviderKey::DateTimeProvider)));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert_eq!(*states.borrow_and_update(), LifecycleState::Stopped);
}

#[tokio::test]
async fn missing_auditor_provider_fails_fast() {
    let builder = ContainerBuilder::new().date_time_provider(FixedDateTimeProvider::new(new_year()));

    let app = Application::new(config(), builder);
    let lifecycle = app.lifecycle();

    let err = app.start().await.err().expect("startup must fail");

    assert!(matches!(err, BootstrapError::MissingCollaborator(ProviderKey::AuditorProvider)));
    assert_ne!(err.exit_code(), 0);
    assert_ne!(lifecycle.state(), LifecycleState::Running);
}

#[tokio::test]
async fn runners_see_context_and_raw_args() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen_args = Arc::new(std::sync::Mutex::new(Vec::new()));
    let builder = ContainerBuilder::new()
        .auditor_provider(FixedAuditor::system())
        .date_time_provider(FixedDateTimeProvider::new(new_year()))
        .startup_runner(CountingRunner {
            calls: calls.clone(),
            seen_args: seen_args.clone(),
        });

    let app = Application::new(config(), builder)
        .with_args(["--spring.profiles.active=prod".to_string(), "extra".to_string()])
        .start()
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *seen_args.lock().unwrap(),
        vec!["--spring.profiles.active=prod".to_string(), "extra".to_string()]
    );

    app.shutdown();
    app.wait().await.unwrap();
}

#[tokio::test]
async fn failing_runner_aborts_startup() {
    let builder = ContainerBuilder::new()
        .auditor_provider(FixedAuditor::system())
        .date_time_provider(FixedDateTimeProvider::new(new_year()))
        .startup_runner(FailingRunner);

    let app = Application::new(config(), builder);
    let lifecycle = app.lifecycle();

    let err = app.start().await.err().expect("startup must fail");

    match &err {
        BootstrapError::Runner { name, .. } => assert_eq!(name, "seed-super-admin"),
        other => panic!("expected runner failure, got {other:?}"),
    }
    assert!(err.to_string().contains("database unreachable"));
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn port_in_use_is_a_startup_failure() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let mut cfg = config();
    cfg.bind_addr = taken.local_addr().unwrap();

    let builder = ContainerBuilder::new()
        .auditor_provider(FixedAuditor::system())
        .date_time_provider(FixedDateTimeProvider::new(new_year()));

    let err = Application::new(cfg, builder).start().await.err().expect("bind must fail");
    assert!(matches!(err, BootstrapError::Bind { .. }));
}

#[tokio::test]
async fn run_until_shutdown_returns_after_programmatic_stop() {
    let builder = ContainerBuilder::new()
        .auditor_provider(FixedAuditor::system())
        .date_time_provider(FixedDateTimeProvider::new(new_year()));

    let app = Application::new(config(), builder).start().await.unwrap();
    let lifecycle = app.lifecycle();
    let serving = tokio::spawn(app.run_until_shutdown());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(lifecycle.state(), LifecycleState::Running);

    assert!(lifecycle.request_stop());
    tokio::time::timeout(Duration::from_secs(5), serving)
        .await
        .expect("server should stop")
        .unwrap()
        .unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn context_auditing_stamps_with_the_security_context() {
    let builder = ContainerBuilder::new()
        .auditor_provider(SecurityContextAuditor)
        .date_time_provider(FixedDateTimeProvider::new(new_year()));

    let app = Application::new(config(), builder).start().await.unwrap();
    let ctx = app.context().clone();

    let doctor = Authentication::authenticated("dr.okello", vec![Role::new("doctor")]);
    let stamped = security_context::scope(doctor, async {
        let mut stamp = AuditStamp::default();
        ctx.auditing().mark_created(&mut stamp);
        stamp
    })
    .await;
    assert_eq!(stamped.created_by.as_ref().map(|a| a.as_str()), Some("dr.okello"));
    assert_eq!(stamped.created_at, Some(new_year()));
    assert_eq!(stamped.updated_by, stamped.created_by);

    let anonymous = security_context::scope(Authentication::Anonymous, async {
        let mut stamp = AuditStamp::default();
        ctx.auditing().mark_created(&mut stamp);
        stamp
    })
    .await;
    assert_eq!(anonymous.created_by, Some(ActorIdentity::system()));
    assert_eq!(anonymous.created_at, Some(new_year()));

    app.shutdown();
    app.wait().await.unwrap();
}
