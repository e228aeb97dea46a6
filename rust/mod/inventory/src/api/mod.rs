mod notebooks;
mod projects;
mod roster;
mod units;

use std::sync::Arc;

use axum::Router;
use umscan_core::Authenticator;

use crate::service::InventoryService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub svc: Arc<InventoryService>,
    pub auth: Arc<dyn Authenticator>,
}

/// Build the inventory API router. The server nests it under `/inventory`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(projects::routes())
        .merge(units::routes())
        .merge(notebooks::routes())
        .merge(roster::routes())
}
