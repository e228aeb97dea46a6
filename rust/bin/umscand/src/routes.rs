//! Route registration: module routes plus system endpoints.

use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::info;
use umscan_core::Module;

use crate::bootstrap;
use crate::config::ServerConfig;

/// Build every module over `kv`, bootstrap the MASTER account and mount
/// each module under `/{name}`.
pub fn assemble(kv: Arc<dyn umscan_kv::KVStore>, config: &ServerConfig) -> anyhow::Result<Router> {
    let auth_config = auth::service::AuthConfig {
        jwt_secret: config.jwt.secret.clone(),
        access_token_ttl: config.jwt.expire_secs,
    };
    let auth_module = auth::AuthModule::new(Arc::clone(&kv), auth_config);
    bootstrap::ensure_master(auth_module.service(), config)?;
    info!("Auth module initialized");

    let inventory_module = inventory::InventoryModule::new(Arc::clone(&kv), auth_module.authenticator());
    info!("Inventory module initialized");

    let modules: [&dyn Module; 2] = [&auth_module, &inventory_module];
    Ok(build_router(&modules))
}

/// Build the complete router with all routes.
pub fn build_router(modules: &[&dyn Module]) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for module in modules {
        app = app.nest(&format!("/{}", module.name()), module.routes());
    }
    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "umscand",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
