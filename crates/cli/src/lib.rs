//! `bustix` console for inspecting tokens, previewing the dashboard menu and
//! managing the persisted admin session.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command, TokenArg};
