//! JWT-backed implementation of [`umscan_core::Authenticator`].

use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};
use umscan_core::{Authenticator, Identity, ServiceError};

use crate::model::Claims;
use crate::service::AuthError;

/// Validates `Authorization: Bearer <token>` headers.
///
/// Stateless: a token stays valid until it expires, so role changes take
/// effect on the next sign-in.
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Decode and validate a raw token.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))
    }
}

/// Extract the Bearer token from the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, ServiceError> {
        let token = extract_bearer(headers)
            .ok_or_else(|| ServiceError::Unauthorized("missing authorization token".into()))?;
        let claims = self.decode(token).map_err(ServiceError::from)?;
        Ok(claims.identity())
    }
}
