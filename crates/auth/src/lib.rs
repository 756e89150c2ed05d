//! `eyesante-auth`: authentication boundary.
//!
//! Decoupled from HTTP: turns bearer tokens into an [`Authentication`] and
//! exposes it to the auditing feature through a per-task security context.

pub mod claims;
pub mod jwt;
pub mod principal;
pub mod security_context;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::{ANONYMOUS_USER, Authentication, Role};
pub use security_context::SecurityContextAuditor;
