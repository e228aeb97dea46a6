use jsonwebtoken::{encode, EncodingKey, Header};
use umscan_core::new_id;

use crate::model::{Claims, LoginRequest, TokenResponse, UserRecord};
use crate::service::password::verify_password;
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Verify e-mail and password, then issue an access token.
    ///
    /// Unknown e-mail and wrong password give the same answer.
    pub fn login(&self, req: &LoginRequest) -> Result<TokenResponse, AuthError> {
        let user = self.find_by_email(&req.email)?;
        match user {
            Some(user) if verify_password(&req.password, &user.password_hash) => {
                tracing::info!(user = %user.id, role = %user.role, "signed in");
                self.issue_token(&user)
            }
            _ => {
                tracing::debug!(email = %req.email.trim(), "rejected sign-in");
                Err(AuthError::Unauthorized("invalid credentials".into()))
            }
        }
    }

    /// Issue an HS256 token carrying the user's role.
    pub fn issue_token(&self, user: &UserRecord) -> Result<TokenResponse, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            sid: new_id(),
            iat: now,
            exp: now + self.config.access_token_ttl,
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
        })
    }

    /// Verify and decode an access token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.authenticator.decode(token)
    }
}
