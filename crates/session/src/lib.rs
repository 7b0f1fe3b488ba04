//! `bustix-session`: the signed-in session of the BusTix admin client.
//!
//! - [`SessionContext`] owns the current token and mirrors it to a durable
//!   [`SessionStore`] so it survives restarts.
//! - [`SessionMonitor`] polls the token's expiry and, the first time it finds
//!   the session invalid, clears it, tells the user once, and sends them to
//!   sign in.

pub mod config;
pub mod context;
pub mod monitor;
pub mod notify;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::SessionConfig;
pub use context::{LoginResponse, SessionContext};
pub use monitor::{CheckOutcome, MonitorHandle, SessionMonitor};
pub use notify::{ExpiryNotifier, LogNavigator, LogNotifier, LoginNavigator};
pub use state::SessionState;
pub use store::{
    FileSessionStore, InMemorySessionStore, SessionStore, SessionStoreError,
    clear_persisted_session,
};
