//! Actor identity written into `created_by` / `updated_by` audit columns.

use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identity of whoever performed a write (a username or a system identifier).
///
/// Never empty. Compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorIdentity(Cow<'static, str>);

impl ActorIdentity {
    /// Fallback actor used when nobody is authenticated.
    pub const SYSTEM: ActorIdentity = ActorIdentity(Cow::Borrowed("system"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("actor identity must not be empty"));
        }
        Ok(Self(name))
    }

    pub fn system() -> Self {
        Self::SYSTEM
    }

    pub fn is_system(&self) -> bool {
        self.0 == Self::SYSTEM.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActorIdentity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ActorIdentity {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorIdentity> for String {
    fn from(value: ActorIdentity) -> Self {
        value.0.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names() {
        assert!(ActorIdentity::new("").is_err());
        assert!(ActorIdentity::new("   ").is_err());
    }

    #[test]
    fn system_actor_is_recognised() {
        let actor: ActorIdentity = "system".parse().unwrap();
        assert!(actor.is_system());
        assert_eq!(actor, ActorIdentity::system());
        assert!(!ActorIdentity::new("nurse.jane").unwrap().is_system());
    }

    #[test]
    fn serializes_as_plain_string() {
        let actor = ActorIdentity::new("dr.okello").unwrap();
        let json = serde_json::to_string(&actor).unwrap();
        assert_eq!(json, "\"dr.okello\"");

        let back: ActorIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, actor);
        assert!(serde_json::from_str::<ActorIdentity>("\"\"").is_err());
    }
}
