use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use umscan_core::{Area, Authenticator, ListParams, ListResult, Message, ServiceError};

use super::AppState;
use crate::model::{MobileUnit, UnitInput};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/units", post(create_unit).get(list_units))
        .route("/units/{id}", get(get_unit).put(update_unit).delete(delete_unit))
}

async fn create_unit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UnitInput>,
) -> Result<(StatusCode, Json<Message>), ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    let unit = state.svc.create_unit(body)?;
    Ok((StatusCode::CREATED, Json(Message::with_id("unit created", unit.id))))
}

async fn list_units(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<MobileUnit>>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.list_units(&params)?))
}

async fn get_unit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MobileUnit>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.get_unit(&id)?))
}

async fn update_unit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UnitInput>,
) -> Result<Json<Message>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    state.svc.update_unit(&id, body)?;
    Ok(Json(Message::new("unit updated")))
}

async fn delete_unit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    state.svc.delete_unit(&id)?;
    Ok(Json(Message::new("unit deleted")))
}
