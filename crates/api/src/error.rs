//! Startup failures. All of them are fatal.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::ConfigError;
use crate::context::ProviderKey;
use crate::lifecycle::TransitionError;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("required collaborator '{0}' is not registered")]
    MissingCollaborator(ProviderKey),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("startup runner '{name}' failed: {source:#}")]
    Runner {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Lifecycle(#[from] TransitionError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl BootstrapError {
    /// Process exit code for this failure. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}
