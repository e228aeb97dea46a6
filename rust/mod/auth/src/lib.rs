//! Auth module: users, password sign-in and JWT sessions.
//!
//! # Resources
//!
//! - **User**: name, e-mail, role and an argon2id password hash
//! - **Session**: stateless HS256 token carrying the user's role
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(kv, AuthConfig::default());
//! let authenticator = module.authenticator(); // hand to other modules
//! let router = module.routes(); // mount under /auth
//! ```

pub mod api;
pub mod authenticator;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use umscan_core::Module;

pub use crate::authenticator::JwtAuthenticator;
use crate::service::{AuthConfig, AuthService};

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(kv: Arc<dyn umscan_kv::KVStore>, config: AuthConfig) -> Self {
        Self {
            service: AuthService::new(kv, config),
        }
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }

    /// Token checker for the other modules' handlers.
    pub fn authenticator(&self) -> Arc<dyn umscan_core::Authenticator> {
        Arc::new(self.service.authenticator().clone())
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
