use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use umscan_core::{Area, Authenticator, ListParams, ListResult, Message, ServiceError};

use super::AppState;
use crate::model::{CreateProject, Project};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project).get(list_projects))
        .route(
            "/projects/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
}

async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateProject>,
) -> Result<(StatusCode, Json<Message>), ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    let project = state.svc.create_project(body)?;
    Ok((StatusCode::CREATED, Json(Message::with_id("project created", project.id))))
}

async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Project>>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.list_projects(&params)?))
}

async fn get_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Project>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.get_project(&id)?))
}

async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Message>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    state.svc.update_project(&id, patch)?;
    Ok(Json(Message::new("project updated")))
}

async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    state.svc.delete_project(&id)?;
    Ok(Json(Message::new("project deleted")))
}
