use serde::Serialize;

use crate::{DecodedClaims, Permission, Role, token};

/// Roles and permissions of the current token, normalized to lists.
///
/// Compute this once when evaluating many checks against the same token; the
/// token-taking free functions below re-decode on every call.
///
/// # Invariant
/// `"*"` in `permissions` or [`Role::ADMIN`] in `roles` grants every
/// permission predicate. The admin check always runs first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedAuthorization {
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl NormalizedAuthorization {
    pub fn from_claims(claims: &DecodedClaims) -> Self {
        Self {
            roles: claims.roles(),
            permissions: claims.permissions(),
        }
    }

    /// Empty for a blank or undecodable token.
    pub fn from_token(token: &str) -> Self {
        if token.trim().is_empty() {
            return Self::default();
        }
        token::decode(token)
            .map(|claims| Self::from_claims(&claims))
            .unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
            || self.permissions.iter().any(Permission::is_wildcard)
    }

    /// Exact, case-sensitive role membership.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin() || self.holds(permission)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        self.is_admin() || permissions.iter().any(|p| self.holds(p.as_ref()))
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        self.is_admin() || permissions.iter().all(|p| self.holds(p.as_ref()))
    }

    fn holds(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.as_str() == permission)
    }
}

pub fn is_admin(token: &str) -> bool {
    NormalizedAuthorization::from_token(token).is_admin()
}

pub fn has_role(token: &str, role: &str) -> bool {
    NormalizedAuthorization::from_token(token).has_role(role)
}

pub fn has_permission(token: &str, permission: &str) -> bool {
    NormalizedAuthorization::from_token(token).has_permission(permission)
}

pub fn has_any_permission<S: AsRef<str>>(token: &str, permissions: &[S]) -> bool {
    NormalizedAuthorization::from_token(token).has_any_permission(permissions)
}

pub fn has_all_permissions<S: AsRef<str>>(token: &str, permissions: &[S]) -> bool {
    NormalizedAuthorization::from_token(token).has_all_permissions(permissions)
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Why a permission check on a token passed or failed.
///
/// Debugging aid for operators; the backend remains the enforcer.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_permission: String,
    pub granted: bool,
    pub reason: String,
    pub principal: PrincipalState,
    pub denial_reason: Option<DenialReason>,
}

/// What the token said about its holder.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub subject: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Undecodable,
    MissingPermission,
}

/// Explain the outcome of `has_permission(token, required)`.
pub fn explain_permission(token: &str, required: &str) -> AuthorizationExplanation {
    let Some(claims) = token::decode(token) else {
        return AuthorizationExplanation {
            required_permission: required.to_string(),
            granted: false,
            reason: "Token could not be decoded; no claims are available".to_string(),
            principal: PrincipalState {
                subject: None,
                roles: Vec::new(),
                permissions: Vec::new(),
                is_admin: false,
            },
            denial_reason: Some(DenialReason {
                kind: DenialKind::Undecodable,
                message: "The token is not a three-segment token with a JSON payload".to_string(),
                suggestions: vec!["Sign in again to obtain a fresh token".to_string()],
            }),
        };
    };

    let authz = NormalizedAuthorization::from_claims(&claims);
    let is_admin = authz.is_admin();
    let principal = PrincipalState {
        subject: claims.sub.clone(),
        roles: authz.roles.iter().map(|r| r.as_str().to_string()).collect(),
        permissions: authz
            .permissions
            .iter()
            .map(|p| p.as_str().to_string())
            .collect(),
        is_admin,
    };

    if authz.has_permission(required) {
        let reason = if authz.roles.iter().any(Role::is_admin) {
            format!("Principal holds the '{}' role", Role::ADMIN)
        } else if is_admin {
            "Principal has wildcard permission '*'".to_string()
        } else {
            format!("Principal has explicit permission '{required}'")
        };

        return AuthorizationExplanation {
            required_permission: required.to_string(),
            granted: true,
            reason,
            principal,
            denial_reason: None,
        };
    }

    AuthorizationExplanation {
        required_permission: required.to_string(),
        granted: false,
        reason: format!(
            "Principal does not have permission '{}'. Current permissions: {:?}",
            required, principal.permissions
        ),
        principal,
        denial_reason: Some(DenialReason {
            kind: DenialKind::MissingPermission,
            message: format!("Missing required permission: '{required}'"),
            suggestions: vec![
                format!("Grant the '{required}' permission to the user's role"),
                format!("Assign the '{}' role", Role::ADMIN),
            ],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::token_with;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn admin_role_scalar_is_admin() {
        let token = token_with(json!({ "role": "Admin" }));
        assert!(is_admin(&token));
    }

    #[test]
    fn wildcard_permission_is_admin_regardless_of_roles() {
        let token = token_with(json!({ "role": "Driver", "permission": "*" }));
        assert!(is_admin(&token));
        assert!(has_permission(&token, "fleet:delete"));
    }

    #[test]
    fn lowercase_admin_is_not_admin() {
        let token = token_with(json!({ "role": "admin" }));
        assert!(!is_admin(&token));
    }

    #[test]
    fn has_role_is_case_sensitive() {
        let token = token_with(json!({ "role": ["Manager"] }));
        assert!(has_role(&token, "Manager"));
        assert!(!has_role(&token, "manager"));
    }

    #[test]
    fn admin_short_circuits_empty_and_unknown_lists() {
        let token = token_with(json!({ "role": "Admin" }));
        let empty: [&str; 0] = [];
        assert!(has_any_permission(&token, &empty));
        assert!(has_all_permissions(&token, &empty));
        assert!(has_all_permissions(&token, &["nope:1", "nope:2"]));
    }

    #[test]
    fn non_admin_permission_sets() {
        let token = token_with(json!({ "permission": ["events:view", "trips:view"] }));
        assert!(has_permission(&token, "events:view"));
        assert!(!has_permission(&token, "events:edit"));
        assert!(has_any_permission(&token, &["events:edit", "trips:view"]));
        assert!(!has_all_permissions(&token, &["events:view", "events:edit"]));
        assert!(has_all_permissions(&token, &["events:view", "trips:view"]));

        let empty: [&str; 0] = [];
        assert!(!has_any_permission(&token, &empty));
        assert!(has_all_permissions(&token, &empty));
    }

    #[test]
    fn no_token_denies_everything() {
        assert!(!is_admin(""));
        assert!(!has_role("", "Admin"));
        assert!(!has_permission("", "x"));
        assert!(!has_any_permission("not-a-token", &["x"]));
    }

    #[test]
    fn explanation_reports_missing_permission() {
        let token = token_with(json!({ "sub": "7", "permission": "events:view" }));
        let explanation = explain_permission(&token, "events:edit");
        assert!(!explanation.granted);
        assert_eq!(explanation.principal.subject.as_deref(), Some("7"));
        let denial = explanation.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingPermission);
        assert!(denial.message.contains("events:edit"));
    }

    #[test]
    fn explanation_reports_admin_grant() {
        let token = token_with(json!({ "role": "Admin" }));
        let explanation = explain_permission(&token, "anything");
        assert!(explanation.granted);
        assert!(explanation.principal.is_admin);
        assert!(explanation.reason.contains("Admin"));
    }

    #[test]
    fn explanation_of_garbage_token() {
        let explanation = explain_permission("garbage", "events:view");
        assert!(!explanation.granted);
        assert_eq!(
            explanation.denial_reason.map(|d| d.kind),
            Some(DenialKind::Undecodable)
        );
    }

    proptest! {
        #[test]
        fn admin_grants_any_permission_query(
            perms in prop::collection::vec("[a-z]{1,8}:[a-z]{1,8}", 0..6),
            use_wildcard in any::<bool>(),
        ) {
            let claims = if use_wildcard {
                json!({ "role": "Clerk", "permission": "*" })
            } else {
                json!({ "role": "Admin" })
            };
            let token = token_with(claims);
            prop_assert!(is_admin(&token));
            prop_assert!(has_any_permission(&token, &perms));
            prop_assert!(has_all_permissions(&token, &perms));
            for p in &perms {
                prop_assert!(has_permission(&token, p));
            }
        }
    }
}
