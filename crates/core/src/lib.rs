//! `eyesante-core`: audit building blocks.
//!
//! This crate contains **pure** primitives (no infrastructure concerns): who
//! acted, when, and how both end up on a record.

pub mod actor;
pub mod audit;
pub mod clock;
pub mod error;

pub use actor::ActorIdentity;
pub use audit::{AuditStamp, Auditable, AuditingHandler, AuditorProvider, FixedAuditor};
pub use clock::{DateTimeProvider, FixedDateTimeProvider, Timestamp, ZonedClock, east_africa_time};
pub use error::{DomainError, DomainResult};
