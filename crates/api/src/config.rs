//! Process configuration, read from the environment.

use std::net::SocketAddr;

use chrono::FixedOffset;
use thiserror::Error;

use eyesante_core::east_africa_time;
use eyesante_observability::LogFormat;

pub const BIND_ADDR_VAR: &str = "EYESANTE_BIND_ADDR";
pub const JWT_SECRET_VAR: &str = "JWT_SECRET";
pub const UTC_OFFSET_VAR: &str = "EYESANTE_UTC_OFFSET";
pub const LOG_FORMAT_VAR: &str = "EYESANTE_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid socket address '{value}'")]
    BindAddr { var: &'static str, value: String },

    #[error("{var}: invalid UTC offset '{value}' (expected e.g. '+03:00')")]
    UtcOffset { var: &'static str, value: String },

    #[error("{var}: {message}")]
    LogFormat { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Offset audit timestamps are rendered at.
    pub utc_offset: FixedOffset,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset and blank values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.trim().parse().map_err(|_| ConfigError::BindAddr {
            var: BIND_ADDR_VAR,
            value: bind_addr.clone(),
        })?;

        let jwt_secret = get(JWT_SECRET_VAR).unwrap_or_else(|| DEV_JWT_SECRET.to_string());

        let utc_offset = match get(UTC_OFFSET_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::UtcOffset {
                var: UTC_OFFSET_VAR,
                value: raw.clone(),
            })?,
            None => east_africa_time(),
        };

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse().map_err(|e: eyesante_observability::ParseLogFormatError| {
                ConfigError::LogFormat {
                    var: LOG_FORMAT_VAR,
                    message: e.to_string(),
                }
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            utc_offset,
            log_format,
        })
    }

    /// True when no `JWT_SECRET` was provided and the insecure default is in use.
    pub fn uses_dev_jwt_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
