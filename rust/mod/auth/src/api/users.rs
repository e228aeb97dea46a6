use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use umscan_core::{Area, Authenticator, ListParams, ListResult, Message, ServiceError};

use crate::api::AppState;
use crate::model::{CreateUser, UpdateUser, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<User>>, ServiceError> {
    svc.authenticator().require(&headers, Area::Users)?;
    Ok(Json(svc.list_users(&params)?))
}

async fn create_user(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<Message>), ServiceError> {
    svc.authenticator().require(&headers, Area::Users)?;
    let user = svc.create_user(input)?;
    Ok((StatusCode::CREATED, Json(Message::with_id("user created", user.id))))
}

async fn get_user(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<User>, ServiceError> {
    svc.authenticator().require(&headers, Area::Users)?;
    Ok(Json(svc.get_user(&id)?))
}

async fn update_user(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<Message>, ServiceError> {
    svc.authenticator().require(&headers, Area::Users)?;
    svc.update_user(&id, input)?;
    Ok(Json(Message::new("user updated")))
}

async fn delete_user(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServiceError> {
    svc.authenticator().require(&headers, Area::Users)?;
    svc.delete_user(&id)?;
    Ok(Json(Message::new("user deleted")))
}
