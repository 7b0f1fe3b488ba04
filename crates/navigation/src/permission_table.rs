//! Fallback path→permission requirements for menu entries without `auth`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bustix_auth::Permission;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationConfigError {
    #[error("failed to read navigation config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid navigation config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Exact-match table from menu path to the permissions that unlock it.
///
/// Holding any one of the listed permissions is enough. A path that is absent,
/// or maps to an empty list, is open to every signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPermissionTable {
    entries: HashMap<String, Vec<Permission>>,
}

impl PathPermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, P>(&mut self, path: impl Into<String>, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.entries
            .insert(path.into(), permissions.into_iter().map(Into::into).collect());
    }

    pub fn with<I, P>(mut self, path: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.insert(path, permissions);
        self
    }

    pub fn required_for(&self, path: &str) -> Option<&[Permission]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object of `{ "/path": ["perm", ...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, NavigationConfigError> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|(path, perms)| (path, perms.into_iter().map(Permission::from).collect()))
            .collect();
        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NavigationConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| NavigationConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            "loaded path permission table"
        );
        Ok(table)
    }

    /// Requirements for the BusTix admin dashboard routes.
    pub fn bustix_default() -> Self {
        Self::new()
            .with("/dashboard", Vec::<Permission>::new())
            .with("/events", ["events:view"])
            .with("/events/new", ["events:create"])
            .with("/trips", ["trips:view"])
            .with("/routes", ["routes:view"])
            .with("/coupons", ["coupons:view"])
            .with("/fleet", ["fleet:view"])
            .with("/fleet/units", ["fleet:view"])
            .with("/users", ["users:view"])
            .with("/roles", ["roles:view", "roles:manage"])
    }
}
