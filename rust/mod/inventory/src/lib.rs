//! Inventory module: projects, mobile units ("UM") and notebook assets.
//!
//! Routes live under `/inventory/v1`. Record managers require the records
//! area (ADMIN or MASTER); the roster feed for the scanner is open to any
//! signed-in identity.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use umscan_core::{Authenticator, Module};

use crate::service::InventoryService;

/// Inventory module implementing the Module trait.
pub struct InventoryModule {
    service: Arc<InventoryService>,
    auth: Arc<dyn Authenticator>,
}

impl InventoryModule {
    pub fn new(kv: Arc<dyn umscan_kv::KVStore>, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            service: Arc::new(InventoryService::new(kv)),
            auth,
        }
    }

    pub fn service(&self) -> &Arc<InventoryService> {
        &self.service
    }
}

impl Module for InventoryModule {
    fn name(&self) -> &str {
        "inventory"
    }

    fn routes(&self) -> Router {
        api::router(api::AppState {
            svc: self.service.clone(),
            auth: self.auth.clone(),
        })
    }
}
