use serde::{Deserialize, Serialize};

use crate::{DecodedClaims, NormalizedAuthorization, Permission, Role, token};

/// Profile of the signed-in user as shown by the dashboard.
///
/// Also the blob persisted alongside the token, hence the camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_status: Option<String>,
    pub email_verified: bool,
    pub is_admin: bool,
}

impl UserInfo {
    pub fn from_claims(claims: &DecodedClaims) -> Self {
        let authz = NormalizedAuthorization::from_claims(claims);
        Self {
            id: claims.sub.clone().unwrap_or_default(),
            email: claims.email.clone().unwrap_or_default(),
            name: claims.name.clone().unwrap_or_default(),
            is_admin: authz.is_admin(),
            roles: authz.roles,
            permissions: authz.permissions,
            account_status: claims.account_status.clone(),
            email_verified: claims.is_email_verified(),
        }
    }
}

/// User profile from `token`, or `None` if it does not decode.
pub fn get_user_info(token: &str) -> Option<UserInfo> {
    token::decode(token).map(|claims| UserInfo::from_claims(&claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::token_with;
    use serde_json::json;

    #[test]
    fn composes_profile_from_claims() {
        let token = token_with(json!({
            "sub": "u-1",
            "email": "dispatch@bustix.test",
            "name": "Dispatch",
            "role": "Operator",
            "permission": ["trips:view"],
            "accountStatus": "Active",
            "emailVerified": "True",
        }));

        let info = get_user_info(&token).unwrap();
        assert_eq!(info.id, "u-1");
        assert_eq!(info.email, "dispatch@bustix.test");
        assert_eq!(info.roles, vec![Role::new("Operator")]);
        assert_eq!(info.permissions, vec![Permission::new("trips:view")]);
        assert_eq!(info.account_status.as_deref(), Some("Active"));
        assert!(info.email_verified);
        assert!(!info.is_admin);
    }

    #[test]
    fn email_verified_false_for_anything_but_literal_true() {
        let token = token_with(json!({ "emailVerified": "False" }));
        assert!(!get_user_info(&token).unwrap().email_verified);

        let token = token_with(json!({}));
        assert!(!get_user_info(&token).unwrap().email_verified);
    }

    #[test]
    fn admin_flag_follows_wildcard() {
        let token = token_with(json!({ "permission": "*" }));
        assert!(get_user_info(&token).unwrap().is_admin);
    }

    #[test]
    fn undecodable_token_has_no_profile() {
        assert!(get_user_info("nope").is_none());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let token = token_with(json!({ "sub": "1", "accountStatus": "Active" }));
        let value = serde_json::to_value(get_user_info(&token).unwrap()).unwrap();
        assert!(value.get("accountStatus").is_some());
        assert!(value.get("isAdmin").is_some());
        assert!(value.get("emailVerified").is_some());
    }
}
