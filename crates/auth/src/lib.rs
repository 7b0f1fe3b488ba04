//! `bustix-auth`: client-side view of the BusTix bearer token.
//!
//! Decodes token claims and answers role/permission questions for the admin
//! dashboard. Nothing here verifies signatures: the backend issues and
//! enforces tokens, and this crate only mirrors its decisions so the UI can
//! hide what the user cannot use.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod roles;
pub mod token;
pub mod user_info;

#[cfg(test)]
mod testing;

pub use authorize::{
    AuthorizationExplanation, DenialKind, DenialReason, NormalizedAuthorization, PrincipalState,
    explain_permission, has_all_permissions, has_any_permission, has_permission, has_role,
    is_admin,
};
pub use claims::{
    ClaimValues, DecodedClaims, LONG_FORM_ROLE_CLAIM, TokenValidationError, expires_at,
    get_permissions, get_roles, is_token_valid, validate_claims, validate_token,
};
pub use permissions::Permission;
pub use roles::Role;
pub use token::{TokenDecodeError, decode, try_decode};
pub use user_info::{UserInfo, get_user_info};
