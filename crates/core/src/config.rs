//! Environment-driven configuration helpers.
//!
//! Every setting has a default. A present-but-unparsable variable is logged and
//! ignored rather than aborting startup.

use core::str::FromStr;
use std::path::PathBuf;

use crate::ConfigError;

/// Read `key` from the environment, parsing it as `T`.
///
/// Returns `default` when the variable is unset, empty, or fails to parse.
pub fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_or(key, raw.trim(), default),
        _ => default,
    }
}

/// Read an optional string setting; unset or blank becomes `None`.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                key,
                value = raw,
                error = %err,
                "ignoring unparsable setting; using default"
            );
            default
        }
    }
}

/// Per-user application data directory: `{data_dir}/bustix`, falling back to
/// `~/.local/share/bustix`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;

    Ok(base.join("bustix"))
}
