use std::time::Duration;

use anyhow::Result;
use bustix_cli::commands::{self, Settings};
use bustix_cli::{Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.log_format {
        Some(format) => bustix_observability::tracing::init(format),
        None => bustix_observability::init(),
    }

    let settings = Settings::from_cli(&cli)?;

    let output = match &cli.command {
        Command::Decode(arg) => commands::decode(&settings.resolve_token(arg)?)?,
        Command::Whoami(arg) => commands::whoami(&settings.resolve_token(arg)?)?,
        Command::Check { token, permissions } => {
            commands::check(&settings.resolve_token(token)?, permissions)?
        }
        Command::Menu { token, nav } => commands::menu(
            &settings.table,
            nav.as_deref(),
            &settings.resolve_token(token)?,
        )?,
        Command::Login {
            token,
            refresh_token,
        } => commands::login(settings.open_store()?, token, refresh_token.clone())?,
        Command::Logout => commands::logout(settings.open_store()?)?,
        Command::Watch { interval_ms } => {
            let mut config = settings.session.clone();
            if let Some(ms) = interval_ms.filter(|ms| *ms > 0) {
                config.check_interval = Duration::from_millis(ms);
            }
            commands::watch(settings.open_store()?, &config).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
