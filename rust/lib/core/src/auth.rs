//! Authentication trait shared by all modules.
//!
//! Modules do NOT depend on the auth module. They only know this trait;
//! the concrete implementation is injected at startup time.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::role::{Admission, Area, Role, SessionStatus};
use crate::ServiceError;

/// The signed-in identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Pluggable authenticator. Handlers call [`Authenticator::require`]
/// with the area their endpoint belongs to.
pub trait Authenticator: Send + Sync + 'static {
    /// Resolve the identity carried by the request headers.
    ///
    /// Returns `ServiceError::Unauthorized` when no valid session is present.
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, ServiceError>;

    /// Authenticate and gate the request on `area`.
    ///
    /// A screen redirect becomes `ServiceError::PermissionDenied`.
    fn require(&self, headers: &HeaderMap, area: Area) -> Result<Identity, ServiceError> {
        let identity = self.authenticate(headers)?;
        match area.admit(&SessionStatus::SignedIn(identity.role)) {
            Admission::Allow => Ok(identity),
            _ => Err(ServiceError::PermissionDenied(format!(
                "role {} may not access the {} area",
                identity.role, area
            ))),
        }
    }
}

/// Authenticates every request as one fixed identity. Used for testing.
pub struct StaticIdentity(pub Identity);

impl StaticIdentity {
    pub fn with_role(role: Role) -> Self {
        Self(Identity {
            user_id: format!("test-{}", role.as_str().to_ascii_lowercase()),
            name: format!("Test {}", role),
            email: format!("{}@test.local", role.as_str().to_ascii_lowercase()),
            role,
        })
    }
}

impl Authenticator for StaticIdentity {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<Identity, ServiceError> {
        Ok(self.0.clone())
    }
}

/// An authenticator that rejects everything. Used for testing.
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<Identity, ServiceError> {
        Err(ServiceError::Unauthorized("missing authorization token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_gates_on_area() {
        let headers = HeaderMap::new();
        let tech = StaticIdentity::with_role(Role::User);
        assert!(tech.require(&headers, Area::Scanner).is_ok());
        let err = tech.require(&headers, Area::Records).unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        let master = StaticIdentity::with_role(Role::Master);
        assert!(master.require(&headers, Area::Users).is_ok());
        assert!(master.require(&headers, Area::Records).is_ok());
    }

    #[test]
    fn deny_all_is_unauthorized() {
        let err = DenyAll.require(&HeaderMap::new(), Area::Scanner).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
