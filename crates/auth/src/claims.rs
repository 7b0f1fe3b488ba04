use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Permission, Role, token};

/// Long-form role claim issued by .NET identity backends.
pub const LONG_FORM_ROLE_CLAIM: &str =
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// A claim the issuer may encode either as one string or as a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValues {
    One(String),
    Many(Vec<String>),
}

impl ClaimValues {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ClaimValues::One(value) => vec![value.clone()],
            ClaimValues::Many(values) => values.clone(),
        }
    }

    /// A string, or the string entries of an array. Anything else is absent.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ClaimValues::One(s.clone())),
            Value::Array(items) => Some(ClaimValues::Many(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn merge(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let mut all = a.to_vec();
                all.extend(b.to_vec());
                Some(ClaimValues::Many(all))
            }
            (a, b) => a.or(b),
        }
    }
}

/// Claims read from a token payload.
///
/// Derived and transient: recompute from the token rather than storing it, so
/// it can never drift from the credential it came from. Every claim is
/// optional, and a claim of an unexpected JSON type reads as absent. Decoding
/// only fails when the payload is not a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct DecodedClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<ClaimValues>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiry, seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_status: Option<String>,

    /// The issuer sends `"True"` / `"False"` strings here, not booleans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// `role` and the long-form role claim, merged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ClaimValues>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<ClaimValues>,

    /// Claims this layer does not interpret.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl From<Map<String, Value>> for DecodedClaims {
    fn from(mut map: Map<String, Value>) -> Self {
        let mut take = |key: &str| map.remove(key);

        let text = |v: Option<Value>| match v {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        // Identifiers are sometimes issued as numbers.
        let id = |v: Option<Value>| match v {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let seconds = |v: Option<Value>| match v {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.floor() as i64)),
            _ => None,
        };
        let values = |v: Option<Value>| v.as_ref().and_then(ClaimValues::from_json);

        let role = ClaimValues::merge(values(take("role")), values(take(LONG_FORM_ROLE_CLAIM)));

        Self {
            sub: id(take("sub")),
            email: text(take("email")),
            name: text(take("name")),
            aud: values(take("aud")),
            iss: text(take("iss")),
            jti: text(take("jti")),
            iat: seconds(take("iat")),
            exp: seconds(take("exp")),
            account_status: text(take("accountStatus")),
            email_verified: text(take("emailVerified")),
            sid: id(take("sid")),
            role,
            permission: values(take("permission")),
            extra: map.into_iter().collect(),
        }
    }
}

impl DecodedClaims {
    pub fn roles(&self) -> Vec<Role> {
        self.role
            .as_ref()
            .map(|r| r.to_vec().into_iter().map(Role::from).collect())
            .unwrap_or_default()
    }

    pub fn permissions(&self) -> Vec<Permission> {
        self.permission
            .as_ref()
            .map(|p| p.to_vec().into_iter().map(Permission::from).collect())
            .unwrap_or_default()
    }

    pub fn audiences(&self) -> Vec<String> {
        self.aud.as_ref().map(ClaimValues::to_vec).unwrap_or_default()
    }

    /// Only the literal `"True"` counts as verified.
    pub fn is_email_verified(&self) -> bool {
        self.email_verified.as_deref() == Some("True")
    }

    /// Expiry for display. Instants past chrono's range are clamped to it.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.map(instant)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.map(instant)
    }
}

fn instant(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(if seconds > 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// Roles carried by `token`; empty when the claim is absent or decoding fails.
pub fn get_roles(token: &str) -> Vec<Role> {
    token::decode(token).map(|c| c.roles()).unwrap_or_default()
}

/// Permissions carried by `token`; empty when the claim is absent or decoding fails.
pub fn get_permissions(token: &str) -> Vec<Permission> {
    token::decode(token).map(|c| c.permissions()).unwrap_or_default()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("no token")]
    Empty,

    #[error("token could not be decoded")]
    Undecodable,

    #[error("token carries no usable expiry")]
    MissingExpiry,

    #[error("token expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
}

/// Check a decoded token's expiry against `now`, returning the expiry.
///
/// Expiry is strict: a token is expired from the instant `exp` is reached.
pub fn validate_claims(
    claims: &DecodedClaims,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TokenValidationError> {
    let exp = claims.exp.ok_or(TokenValidationError::MissingExpiry)?;
    if now.timestamp() >= exp {
        return Err(TokenValidationError::Expired {
            expired_at: instant(exp),
        });
    }
    Ok(instant(exp))
}

/// Decode `token` and check its expiry against `now`.
pub fn validate_token(
    token: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TokenValidationError> {
    if token.trim().is_empty() {
        return Err(TokenValidationError::Empty);
    }
    let claims = token::decode(token).ok_or(TokenValidationError::Undecodable)?;
    validate_claims(&claims, now)
}

/// `true` iff `token` is non-empty, decodable, and not yet expired at `now`.
pub fn is_token_valid(token: &str, now: DateTime<Utc>) -> bool {
    validate_token(token, now).is_ok()
}

/// Expiry of `token`, if it decodes and carries one.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    token::decode(token).and_then(|c| c.expires_at())
}
