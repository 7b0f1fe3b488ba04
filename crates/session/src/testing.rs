use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

/// HS256 token for `role` whose `exp` is `ttl` from now (negative = already expired).
pub(crate) fn mint_expiring_in(ttl: Duration, role: &str) -> String {
    let now = Utc::now();
    let claims = json!({
        "sub": "user-1",
        "email": "ops@bustix.test",
        "name": "Ops",
        "jti": uuid::Uuid::now_v7().to_string(),
        "iat": now.timestamp(),
        "exp": (now + ttl).timestamp(),
        "role": role,
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"session-tests"),
    )
    .expect("failed to encode jwt")
}
