//! Process lifecycle: `STARTING → RUNNING → STOPPED`.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Starting,
    Running,
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
        }
    }

    fn can_become(self, next: LifecycleState) -> bool {
        matches!(
            (self, next),
            (Self::Starting, Self::Running)
                | (Self::Starting, Self::Stopped)
                | (Self::Running, Self::Stopped)
        )
    }
}

impl core::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid lifecycle transition {from} -> {to}")]
pub struct TransitionError {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Shared, observable lifecycle state.
///
/// Clones share the same state. Rejected transitions leave it unchanged.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LifecycleState::Starting);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    pub fn mark_running(&self) -> Result<(), TransitionError> {
        self.transition(LifecycleState::Running)
    }

    pub fn mark_stopped(&self) -> Result<(), TransitionError> {
        self.transition(LifecycleState::Stopped)
    }

    /// Move to `STOPPED` unless already there. Returns whether this call did it.
    pub fn request_stop(&self) -> bool {
        self.mark_stopped().is_ok()
    }

    /// Resolves once the state is `STOPPED`.
    pub async fn stopped(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|s| *s == LifecycleState::Stopped).await;
    }

    fn transition(&self, to: LifecycleState) -> Result<(), TransitionError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|state| {
            if state.can_become(to) {
                tracing::info!(from = %state, to = %to, "lifecycle transition");
                *state = to;
                true
            } else {
                outcome = Err(TransitionError { from: *state, to });
                false
            }
        });
        outcome
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
