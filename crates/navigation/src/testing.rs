use jsonwebtoken::{Algorithm, EncodingKey, Header};

pub(crate) fn mint(claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"navigation-tests"),
    )
    .expect("failed to encode jwt")
}
