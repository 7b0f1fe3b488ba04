use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier carried in the token's `role` claim.
///
/// Roles are opaque strings issued by the backend. The only role this layer
/// interprets is [`Role::ADMIN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// The administrator role. Holding it grants every permission check.
    pub const ADMIN: Role = Role(Cow::Borrowed("Admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive admin check.
    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN.as_str()
    }

    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.as_str().to_lowercase() == other.to_lowercase()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}
