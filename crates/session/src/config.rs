use std::path::PathBuf;
use std::time::Duration;

use bustix_core::config::{data_dir, env_opt, env_or};
use bustix_core::{ConfigError, ConfigResult};

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(60_000);
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Session settings.
///
/// Environment:
/// - `BUSTIX_SESSION_CHECK_INTERVAL_MS`: monitor period (default 60000)
/// - `BUSTIX_LOGIN_PATH`: sign-in entry point (default `/login`)
/// - `BUSTIX_SESSION_FILE`: persisted session file (default `<data dir>/session.json`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub check_interval: Duration,
    pub login_path: String,
    pub session_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            session_file: None,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let interval_ms: u64 = env_or(
            "BUSTIX_SESSION_CHECK_INTERVAL_MS",
            DEFAULT_CHECK_INTERVAL.as_millis() as u64,
        );
        let check_interval = if interval_ms == 0 {
            tracing::warn!("BUSTIX_SESSION_CHECK_INTERVAL_MS must be positive; using default");
            DEFAULT_CHECK_INTERVAL
        } else {
            Duration::from_millis(interval_ms)
        };

        Self {
            check_interval,
            login_path: env_opt("BUSTIX_LOGIN_PATH")
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            session_file: env_opt("BUSTIX_SESSION_FILE").map(PathBuf::from),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.check_interval.is_zero() {
            return Err(ConfigError::invalid("check_interval", "must be positive"));
        }
        if !self.login_path.starts_with('/') {
            return Err(ConfigError::invalid("login_path", "must start with '/'"));
        }
        Ok(())
    }

    /// Configured session file, or `session.json` in the data directory.
    pub fn session_file_or_default(&self) -> ConfigResult<PathBuf> {
        match &self.session_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("session.json")),
        }
    }
}
