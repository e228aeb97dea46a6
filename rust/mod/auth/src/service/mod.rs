pub mod password;
pub mod session;
pub mod user;

use std::sync::Arc;

use thiserror::Error;
use umscan_core::ServiceError;
use umscan_kv::KVStore;
use umscan_store::KvOps;

use crate::authenticator::JwtAuthenticator;
use crate::model::UserRecord;

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => ServiceError::NotFound(m),
            AuthError::Conflict(m) => ServiceError::Conflict(m),
            AuthError::Validation(m) => ServiceError::Validation(m),
            AuthError::Unauthorized(m) => ServiceError::Unauthorized(m),
            AuthError::Forbidden(m) => ServiceError::PermissionDenied(m),
            AuthError::Internal(m) => ServiceError::Internal(m),
            AuthError::Service(e) => e,
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_token_ttl: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "umscan-dev-secret-change-me".to_string(),
            access_token_ttl: 86400,
        }
    }
}

/// The Auth service. Holds the user store and signing configuration.
pub struct AuthService {
    pub(crate) users: KvOps<UserRecord>,
    pub(crate) config: AuthConfig,
    pub(crate) authenticator: JwtAuthenticator,
}

impl AuthService {
    pub fn new(kv: Arc<dyn KVStore>, config: AuthConfig) -> Arc<Self> {
        let authenticator = JwtAuthenticator::new(&config.jwt_secret);
        Arc::new(Self {
            users: KvOps::new(kv),
            config,
            authenticator,
        })
    }

    /// Stateless token checker sharing this service's secret.
    pub fn authenticator(&self) -> &JwtAuthenticator {
        &self.authenticator
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> Arc<AuthService> {
    let kv: Arc<dyn KVStore> = Arc::new(umscan_kv::MemoryStore::new());
    AuthService::new(
        kv,
        AuthConfig {
            jwt_secret: "test-secret".into(),
            ..Default::default()
        },
    )
}
