//! Command implementations. Each returns JSON for `main` to print.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use bustix_auth::{explain_permission, get_user_info, try_decode};
use bustix_navigation::{
    MenuFilter, NavSection, PathPermissionTable, default_navigation, load_navigation,
};
use bustix_session::{
    FileSessionStore, LoginResponse, SessionConfig, SessionContext, SessionMonitor, SessionStore,
};
use serde_json::{Value, json};

use crate::cli::{Cli, TokenArg};

/// Settings resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub session: SessionConfig,
    pub table: PathPermissionTable,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut session = SessionConfig::from_env();
        if let Some(path) = &cli.session_file {
            session.session_file = Some(path.clone());
        }
        session.validate().context("invalid session configuration")?;

        let table = match &cli.permission_table {
            Some(path) => PathPermissionTable::load(path)?,
            None => PathPermissionTable::bustix_default(),
        };

        Ok(Self { session, table })
    }

    pub fn open_store(&self) -> Result<Arc<dyn SessionStore>> {
        let path = self.session.session_file_or_default()?;
        let store = FileSessionStore::open(&path)
            .with_context(|| format!("failed to open session file {}", path.display()))?;
        Ok(Arc::new(store))
    }

    /// The explicit token, or the persisted session's.
    pub fn resolve_token(&self, arg: &TokenArg) -> Result<String> {
        if let Some(token) = arg.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(token.trim().to_string());
        }
        let context = SessionContext::rehydrate(self.open_store()?)?;
        match context.token() {
            Some(token) => Ok(token),
            None => bail!("not signed in; pass --token or run `bustix login`"),
        }
    }
}

pub fn decode(token: &str) -> Result<Value> {
    let claims = try_decode(token).context("token could not be decoded")?;
    Ok(serde_json::to_value(claims)?)
}

pub fn whoami(token: &str) -> Result<Value> {
    match get_user_info(token) {
        Some(info) => Ok(serde_json::to_value(info)?),
        None => bail!("token could not be decoded"),
    }
}

pub fn check(token: &str, permissions: &[String]) -> Result<Value> {
    let explanations = permissions
        .iter()
        .map(|p| explain_permission(token, p))
        .collect::<Vec<_>>();
    Ok(serde_json::to_value(explanations)?)
}

pub fn menu(table: &PathPermissionTable, nav: Option<&Path>, token: &str) -> Result<Value> {
    let tree: Vec<NavSection> = match nav {
        Some(path) => load_navigation(path)?,
        None => default_navigation(),
    };
    let filtered = MenuFilter::new(table).filter_navigation(&tree, Some(token));
    Ok(serde_json::to_value(filtered)?)
}

pub fn login(
    store: Arc<dyn SessionStore>,
    token: &str,
    refresh_token: Option<String>,
) -> Result<Value> {
    if try_decode(token).is_err() {
        tracing::warn!("storing a token whose claims cannot be read");
    }

    let context = SessionContext::new(store);
    context.login(LoginResponse {
        token: token.trim().to_string(),
        refresh_token,
        user: None,
    })?;

    Ok(json!({
        "signedIn": true,
        "expiresAt": context.snapshot().expires_at,
        "user": context.user_info(),
    }))
}

pub fn logout(store: Arc<dyn SessionStore>) -> Result<Value> {
    SessionContext::new(store).logout()?;
    Ok(json!({ "signedIn": false }))
}

/// Run the session monitor over the persisted session until it ends.
pub async fn watch(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Result<Value> {
    let context = SessionContext::rehydrate(store)?;
    if context.token().is_none() {
        bail!("not signed in; nothing to watch");
    }

    let handle = SessionMonitor::new(context.clone(), config).start();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut poll = tokio::time::interval(Duration::from_secs(1));

    let reason = loop {
        tokio::select! {
            _ = &mut ctrl_c => break "interrupted",
            _ = poll.tick() => {
                if context.token().is_none() {
                    break "session expired";
                }
            }
        }
    };

    handle.stop().await;
    Ok(json!({ "stopped": reason }))
}
