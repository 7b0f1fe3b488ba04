//! `bustix-core`: shared foundation for the BusTix admin client crates.
//!
//! This crate carries no authorization logic; it holds the clock seam and the
//! environment-driven configuration helpers the other crates build on.

pub mod clock;
pub mod config;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, ConfigResult};
