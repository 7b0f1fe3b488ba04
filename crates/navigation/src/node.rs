use serde::{Deserialize, Serialize};

/// Prefix marking an `auth` entry as a permission rather than a role.
pub const PERMISSION_PREFIX: &str = "permission:";

/// One entry in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavNode {
    pub title: String,
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavNode>>,

    /// Role names, or permission names prefixed with [`PERMISSION_PREFIX`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Vec<String>>,

    /// Never shown.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub hidden: bool,

    /// Shown but inert; bypasses the access check.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub disabled: bool,
}

impl NavNode {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            icon: None,
            children: None,
            auth: None,
            hidden: false,
            disabled: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_children(mut self, children: Vec<NavNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_auth<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth = Some(entries.into_iter().map(Into::into).collect());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// A titled group of top-level navigation entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    pub name: String,
    pub items: Vec<NavNode>,
}

impl NavSection {
    pub fn new(name: impl Into<String>, items: Vec<NavNode>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// A classified `auth` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEntry {
    Role(String),
    Permission(String),
}

impl AuthEntry {
    /// Anything not starting with exactly `permission:` is a role name.
    pub fn parse(entry: &str) -> Self {
        match entry.strip_prefix(PERMISSION_PREFIX) {
            Some(permission) => AuthEntry::Permission(permission.trim().to_string()),
            None => AuthEntry::Role(entry.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auth_entries() {
        assert_eq!(AuthEntry::parse("Admin"), AuthEntry::Role("Admin".into()));
        assert_eq!(
            AuthEntry::parse("permission: trips:view "),
            AuthEntry::Permission("trips:view".into())
        );
        // Prefix match is literal and case-sensitive.
        assert_eq!(
            AuthEntry::parse("Permission:trips:view"),
            AuthEntry::Role("Permission:trips:view".into())
        );
    }

    #[test]
    fn deserializes_sparse_json_nodes() {
        let node: NavNode = serde_json::from_str(
            r#"{
                "title": "Fleet",
                "path": "/fleet",
                "children": [{ "title": "Units", "path": "/fleet/units", "disabled": true }]
            }"#,
        )
        .unwrap();

        assert!(node.has_children());
        assert!(!node.hidden);
        let units = &node.children.as_ref().unwrap()[0];
        assert!(units.disabled);
        assert_eq!(units.auth, None);
    }

    #[test]
    fn serialization_omits_defaults() {
        let value = serde_json::to_value(NavNode::new("Trips", "/trips")).unwrap();
        assert_eq!(value, serde_json::json!({ "title": "Trips", "path": "/trips" }));
    }
}
