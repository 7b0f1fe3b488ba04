//! Role/permission-aware pruning of the navigation tree.
//!
//! The filter only decides what the dashboard *shows*. The backend still
//! authorizes every request.

use bustix_auth::NormalizedAuthorization;

use crate::{AuthEntry, NavNode, NavSection, PathPermissionTable};

/// Filters navigation trees against a bearer token.
///
/// The token is decoded once per call and every node is evaluated against
/// that single decode.
#[derive(Debug, Clone, Copy)]
pub struct MenuFilter<'a> {
    table: &'a PathPermissionTable,
}

impl<'a> MenuFilter<'a> {
    pub fn new(table: &'a PathPermissionTable) -> Self {
        Self { table }
    }

    /// Sections and items the holder of `token` may see, in original order.
    ///
    /// Without a token nothing is shown. Sections left without items are
    /// dropped.
    pub fn filter_navigation(&self, tree: &[NavSection], token: Option<&str>) -> Vec<NavSection> {
        let Some(authz) = signed_in(token) else {
            return Vec::new();
        };

        let filtered: Vec<NavSection> = tree
            .iter()
            .filter_map(|section| {
                let items = self.filter_with(&section.items, Some(&authz));
                (!items.is_empty()).then(|| NavSection {
                    name: section.name.clone(),
                    items,
                })
            })
            .collect();

        tracing::debug!(
            sections_in = tree.len(),
            sections_out = filtered.len(),
            "filtered navigation"
        );
        filtered
    }

    /// Filter one level of nodes (and, recursively, their children).
    pub fn filter_nav_items(&self, items: &[NavNode], token: Option<&str>) -> Vec<NavNode> {
        let authz = signed_in(token);
        self.filter_with(items, authz.as_ref())
    }

    /// Whether the holder of `token` may open `path`.
    pub fn can_access_menu_item(
        &self,
        path: &str,
        token: Option<&str>,
        auth: Option<&[String]>,
    ) -> bool {
        let authz = signed_in(token);
        self.can_access_with(path, authz.as_ref(), auth)
    }

    fn filter_with(
        &self,
        items: &[NavNode],
        authz: Option<&NormalizedAuthorization>,
    ) -> Vec<NavNode> {
        items
            .iter()
            .filter(|node| {
                if node.hidden {
                    return false;
                }
                if node.disabled {
                    return true;
                }
                self.can_access_with(&node.path, authz, node.auth.as_deref())
            })
            .filter_map(|node| {
                if !node.has_children() {
                    return Some(node.clone());
                }

                let children =
                    self.filter_with(node.children.as_deref().unwrap_or_default(), authz);
                if children.is_empty() {
                    // A group with nothing visible under it is dropped.
                    return None;
                }

                let mut node = node.clone();
                node.children = Some(children);
                Some(node)
            })
            .collect()
    }

    fn can_access_with(
        &self,
        path: &str,
        authz: Option<&NormalizedAuthorization>,
        auth: Option<&[String]>,
    ) -> bool {
        let Some(authz) = authz else {
            return false;
        };
        if authz.is_admin() {
            return true;
        }

        if let Some(entries) = auth.filter(|entries| !entries.is_empty()) {
            let mut roles = Vec::new();
            let mut permissions = Vec::new();
            for entry in entries {
                match AuthEntry::parse(entry) {
                    AuthEntry::Role(role) => roles.push(role),
                    AuthEntry::Permission(permission) => permissions.push(permission),
                }
            }

            // A list with any permission entry is decided by permissions only;
            // role entries in such a list do not grant access.
            return if permissions.is_empty() {
                any_role_matches(authz, &roles)
            } else {
                authz.has_any_permission(&permissions)
            };
        }

        match self.table.required_for(path) {
            Some(required) if !required.is_empty() => authz.has_any_permission(
                &required.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            ),
            _ => true,
        }
    }
}

/// Case-insensitive: does `token` carry any of `roles`?
///
/// Unlike [`bustix_auth::has_role`], which matches case-sensitively.
pub fn has_any_role<S: AsRef<str>>(token: &str, roles: &[S]) -> bool {
    any_role_matches(&NormalizedAuthorization::from_token(token), roles)
}

fn any_role_matches<S: AsRef<str>>(authz: &NormalizedAuthorization, roles: &[S]) -> bool {
    let wanted: Vec<String> = roles.iter().map(|r| r.as_ref().to_lowercase()).collect();
    authz
        .roles
        .iter()
        .any(|held| wanted.contains(&held.as_str().to_lowercase()))
}

fn signed_in(token: Option<&str>) -> Option<NormalizedAuthorization> {
    token
        .filter(|t| !t.trim().is_empty())
        .map(NormalizedAuthorization::from_token)
}
