//! Structural bearer-token decoding.
//!
//! A token is `header.payload.signature`, each segment base64url-encoded. Only
//! the payload is read. The signature is **not** verified and expiry is **not**
//! checked here: the backend authenticated the token when it issued it, and the
//! claims read on this side only drive what the UI shows. Never use a decoded
//! claim as a security decision on its own.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

use crate::DecodedClaims;

#[derive(Debug, Error)]
pub enum TokenDecodeError {
    #[error("token is empty")]
    Empty,

    #[error("expected 3 dot-separated segments, found {found}")]
    Segments { found: usize },

    #[error("token payload segment is empty")]
    EmptyPayload,

    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not a claims object: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Decode the claims of `token`, reporting why decoding failed.
pub fn try_decode(token: &str) -> Result<DecodedClaims, TokenDecodeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::Segments {
            found: segments.len(),
        });
    }

    // Some issuers pad, some emit the standard alphabet. Normalize both.
    let payload: String = segments[1]
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    if payload.is_empty() {
        return Err(TokenDecodeError::EmptyPayload);
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode the claims of `token`.
///
/// Malformed input yields `None` and a warning; this never panics. The token
/// itself is not logged.
pub fn decode(token: &str) -> Option<DecodedClaims> {
    match try_decode(token) {
        Ok(claims) => Some(claims),
        Err(err) => {
            tracing::warn!(error = %err, "failed to decode bearer token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::token_with;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn decodes_payload_claims() {
        let token = token_with(json!({
            "sub": "42",
            "email": "ops@bustix.test",
            "name": "Ops",
            "exp": 1_900_000_000i64,
            "role": "Admin",
        }));

        let claims = try_decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.email.as_deref(), Some("ops@bustix.test"));
        assert_eq!(claims.exp, Some(1_900_000_000));
    }

    #[test]
    fn any_json_object_decodes() {
        let token = token_with(json!({
            "sub": 42,
            "emailVerified": false,
            "exp": 1_900_000_000.5,
            "role": ["Admin", 1],
        }));

        let claims = try_decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.exp, Some(1_900_000_000));
        assert_eq!(claims.roles(), vec![crate::Role::ADMIN]);

        assert!(try_decode(&token_with(json!({}))).is_ok());
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(matches!(
            try_decode("a.b"),
            Err(TokenDecodeError::Segments { found: 2 })
        ));
        assert!(matches!(
            try_decode("a.b.c.d"),
            Err(TokenDecodeError::Segments { found: 4 })
        ));
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert!(matches!(try_decode(""), Err(TokenDecodeError::Empty)));
        assert!(matches!(try_decode("   "), Err(TokenDecodeError::Empty)));
        assert!(matches!(try_decode("a..c"), Err(TokenDecodeError::EmptyPayload)));
    }

    #[test]
    fn rejects_non_base64_payload() {
        assert!(matches!(
            try_decode("a.!!!!.c"),
            Err(TokenDecodeError::Base64(_))
        ));
    }

    #[test]
    fn rejects_payload_that_is_not_an_object() {
        let payload = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        let token = format!("e30.{payload}.sig");
        assert!(matches!(try_decode(&token), Err(TokenDecodeError::Payload(_))));

        let payload = URL_SAFE_NO_PAD.encode(b"not json");
        let token = format!("e30.{payload}.sig");
        assert!(decode(&token).is_none());
    }

    #[test]
    fn tolerates_padding_and_standard_alphabet() {
        // Standard alphabet with padding: "eyJuYW1lIjoiPz8/Pj4+In0=".
        let body = br#"{"name":"???>>>"}"#;
        let standard = base64::engine::general_purpose::STANDARD.encode(body);
        assert!(standard.contains('/') && standard.contains('+') && standard.ends_with('='));

        let token = format!("e30.{standard}.sig");
        let claims = try_decode(&token).unwrap();
        assert_eq!(claims.name.as_deref(), Some("???>>>"));
    }

    proptest! {
        #[test]
        fn decode_never_panics_on_arbitrary_input(input in ".*") {
            let _ = decode(&input);
        }

        #[test]
        fn decode_never_panics_on_three_arbitrary_segments(
            a in "[A-Za-z0-9_-]{0,16}",
            b in "[A-Za-z0-9_+/=-]{0,64}",
            c in "[A-Za-z0-9_-]{0,16}",
        ) {
            let _ = decode(&format!("{a}.{b}.{c}"));
        }
    }
}
