use chrono::{DateTime, Utc};

/// In-memory view of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Set once the user has been told their session expired. Reset only when
    /// a new session begins (login) or the user signs out.
    pub expiry_notified: bool,
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}
