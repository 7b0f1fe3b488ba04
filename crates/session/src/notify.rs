//! Side effects of an expired session: telling the user, sending them to sign in.

use bustix_auth::TokenValidationError;

/// Shows the user a one-time "your session has expired" notice.
pub trait ExpiryNotifier: Send + Sync {
    fn session_expired(&self, reason: &TokenValidationError);
}

/// Sends the user to the sign-in entry point.
pub trait LoginNavigator: Send + Sync {
    fn redirect_to_login(&self, login_path: &str);
}

/// Notifier for headless runs: the notice goes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl ExpiryNotifier for LogNotifier {
    fn session_expired(&self, reason: &TokenValidationError) {
        tracing::warn!(%reason, "Your session has expired. Please sign in again.");
    }
}

/// Navigator for headless runs: the redirect goes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl LoginNavigator for LogNavigator {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::info!(login_path, "redirecting to sign-in");
    }
}
