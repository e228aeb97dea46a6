use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use umscan_core::{Area, Authenticator, ServiceError};

use super::AppState;
use crate::model::{ScannerData, Summary};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scanner-data", get(scanner_data))
        .route("/summary", get(summary))
}

/// Open to any signed-in identity.
async fn scanner_data(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ScannerData>, ServiceError> {
    let who = state.auth.authenticate(&headers)?;
    tracing::debug!(user = %who.user_id, "roster requested");
    Ok(Json(state.svc.scanner_data()?))
}

async fn summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Summary>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.summary()?))
}
