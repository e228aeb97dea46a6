use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use umscan_core::{Authenticator, ServiceError};

use crate::api::AppState;
use crate::model::{LoginRequest, MeResponse, TokenResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn login(
    State(svc): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ServiceError> {
    Ok(Json(svc.login(&body)?))
}

async fn me(
    State(svc): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, ServiceError> {
    let identity = svc.authenticator().authenticate(&headers)?;
    let home = identity.role.home().path().to_string();
    Ok(Json(MeResponse { identity, home }))
}
