//! Background expiry check for the current session.

use std::sync::Arc;
use std::time::Duration;

use bustix_auth::validate_token;
use bustix_core::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::notify::{ExpiryNotifier, LogNavigator, LogNotifier, LoginNavigator};
use crate::{SessionConfig, SessionContext};

/// Result of one monitor tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Nobody is signed in; nothing to do.
    NoSession,
    Valid { expires_at: DateTime<Utc> },
    /// The session was found invalid on this tick and has been torn down.
    Expired,
    /// The session is invalid but the user was already told.
    AlreadyNotified,
}

/// Periodically invalidates the session once its token has expired.
///
/// The first expired tick clears the session, notifies the user once, and
/// redirects to sign-in. Later ticks in the same session lifetime do nothing.
pub struct SessionMonitor {
    context: SessionContext,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ExpiryNotifier>,
    navigator: Arc<dyn LoginNavigator>,
    check_interval: Duration,
    login_path: String,
}

impl SessionMonitor {
    pub fn new(context: SessionContext, config: &SessionConfig) -> Self {
        Self {
            context,
            clock: Arc::new(SystemClock),
            notifier: Arc::new(LogNotifier),
            navigator: Arc::new(LogNavigator),
            check_interval: config.check_interval,
            login_path: config.login_path.clone(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ExpiryNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn LoginNavigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Run one tick now.
    pub fn check(&self) -> CheckOutcome {
        let Some(token) = self.context.token() else {
            return CheckOutcome::NoSession;
        };

        let reason = match validate_token(&token, self.clock.now()) {
            Ok(expires_at) => return CheckOutcome::Valid { expires_at },
            Err(reason) => reason,
        };

        if !self.context.latch_expiry_notice() {
            return CheckOutcome::AlreadyNotified;
        }

        tracing::info!(%reason, "session is no longer valid; signing out");
        if let Err(err) = self.context.invalidate() {
            tracing::error!(error = %err, "failed to clear persisted session");
        }
        self.notifier.session_expired(&reason);
        self.navigator.redirect_to_login(&self.login_path);

        CheckOutcome::Expired
    }

    /// Start ticking: once immediately, then every check interval.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(self) -> MonitorHandle {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();

        let task = tokio::spawn(async move {
            tracing::info!(interval = ?self.check_interval, "session monitor started");

            let mut ticker = tokio::time::interval(self.check_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = signal.notified() => {
                        tracing::info!("session monitor received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let outcome = self.check();
                        tracing::debug!(?outcome, "session check");
                    }
                }
            }

            tracing::info!("session monitor stopped");
        });

        MonitorHandle {
            shutdown,
            task: Some(task),
        }
    }
}

/// Owner of a running [`SessionMonitor`].
///
/// Dropping the handle aborts the monitor task.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Stop the monitor and wait for it to exit. No tick runs after this returns.
    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    tracing::error!(error = %err, "session monitor task failed");
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
