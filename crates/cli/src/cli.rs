use std::path::PathBuf;

use bustix_observability::LogFormat;
use clap::{Args, Parser, Subcommand};

/// bustix - BusTix admin session & navigation console
#[derive(Parser, Debug)]
#[command(name = "bustix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Persisted session file
    #[arg(long, env = "BUSTIX_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// JSON file overriding the path→permission table
    #[arg(long, env = "BUSTIX_PERMISSION_TABLE", global = true)]
    pub permission_table: Option<PathBuf>,

    /// Log output format (json, pretty)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TokenArg {
    /// Bearer token; defaults to the persisted session's token
    #[arg(long, env = "BUSTIX_TOKEN")]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token's claims
    Decode(TokenArg),

    /// Print the signed-in user's profile
    Whoami(TokenArg),

    /// Explain whether the token grants each permission
    Check {
        #[command(flatten)]
        token: TokenArg,

        /// Permissions to check
        #[arg(required = true)]
        permissions: Vec<String>,
    },

    /// Print the navigation menu the token may see
    Menu {
        #[command(flatten)]
        token: TokenArg,

        /// JSON file with the navigation sections (defaults to the built-in menu)
        #[arg(long)]
        nav: Option<PathBuf>,
    },

    /// Persist a session from a token issued by the backend
    Login {
        #[arg(long)]
        token: String,

        #[arg(long)]
        refresh_token: Option<String>,
    },

    /// Clear the persisted session
    Logout,

    /// Watch the persisted session until it expires (or Ctrl-C)
    Watch {
        /// Check interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}
