use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use eyesante_core::ActorIdentity;

/// Name some security layers give to an unauthenticated caller.
pub const ANONYMOUS_USER: &str = "anonymousUser";

/// Role identifier attached to an authenticated principal.
///
/// Roles are opaque strings at this layer; nothing here maps them to
/// permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Security context of one unit of work (usually one HTTP request).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Authentication {
    #[default]
    Anonymous,
    Authenticated { username: String, roles: Vec<Role> },
}

impl Authentication {
    pub fn authenticated(username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self::Authenticated {
            username: username.into(),
            roles,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Anonymous => ANONYMOUS_USER,
            Self::Authenticated { username, .. } => username,
        }
    }

    pub fn roles(&self) -> &[Role] {
        match self {
            Self::Anonymous => &[],
            Self::Authenticated { roles, .. } => roles,
        }
    }

    /// Actor to record for writes made under this context.
    ///
    /// Anonymous callers, blank names and the `anonymousUser` placeholder all
    /// map to the system actor.
    pub fn actor(&self) -> ActorIdentity {
        match self {
            Self::Authenticated { username, .. } if username != ANONYMOUS_USER => {
                ActorIdentity::new(username.clone()).unwrap_or_else(|_| ActorIdentity::system())
            }
            _ => ActorIdentity::system(),
        }
    }
}
