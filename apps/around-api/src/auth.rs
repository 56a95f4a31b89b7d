//! Bearer-token authentication gate
//!
//! Tokens are HS256 JWTs carrying the author's `username` and an `exp`
//! claim. Issuing them is someone else's job; this module only verifies.

use std::sync::Arc;

use around_domain::Principal;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

type AuthorizationHeader = TypedHeader<Authorization<Bearer>>;

/// Claims expected in an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: usize,
}

/// Verifies access tokens signed with a shared secret
pub struct JwtVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn hs256(secret: &[u8]) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Check the token's signature and expiry and return its principal
    pub fn verify(&self, token: &str) -> Result<Principal, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Principal::new(data.claims.username).ok_or(ApiError::MissingPrincipal)
    }
}

/// The verified author of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<JwtVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            AuthorizationHeader::from_request_parts(parts, state).await?;

        let principal = Arc::<JwtVerifier>::from_ref(state).verify(bearer.token())?;

        Ok(Self(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";
    // 2100-01-01T00:00:00Z
    const FAR_FUTURE: usize = 4_102_444_800;

    fn token(username: &str, exp: usize, secret: &[u8]) -> String {
        let claims = Claims {
            username: username.to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_valid_token_yields_principal() {
        let verifier = JwtVerifier::hs256(SECRET);
        let principal = verifier.verify(&token("john", FAR_FUTURE, SECRET)).unwrap();
        assert_eq!(principal.as_str(), "john");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = JwtVerifier::hs256(SECRET);
        let result = verifier.verify(&token("john", FAR_FUTURE, b"other"));
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let verifier = JwtVerifier::hs256(SECRET);
        let result = verifier.verify(&token("john", 1_000, SECRET));
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_empty_username_is_rejected() {
        let verifier = JwtVerifier::hs256(SECRET);
        let result = verifier.verify(&token("", FAR_FUTURE, SECRET));
        assert!(matches!(result, Err(ApiError::MissingPrincipal)));
    }
}
