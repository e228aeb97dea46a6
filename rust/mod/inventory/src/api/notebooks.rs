use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use umscan_core::{Area, Authenticator, ListParams, ListResult, Message, ServiceError};

use super::AppState;
use crate::model::{BatchCreate, CreateNotebook, Notebook, ReassignNotebook, UnitGroup};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notebooks", post(create_notebook).get(list_notebooks))
        .route("/notebooks/batch", post(batch_create))
        .route("/notebooks/grouped", get(grouped))
        .route(
            "/notebooks/{id}",
            get(get_notebook).put(reassign_notebook).delete(delete_notebook),
        )
        .route("/units/{id}/notebooks", delete(delete_unit_notebooks))
}

/// List filters. `serde(flatten)` loses numeric fields in query strings,
/// so the `ListParams` fields are repeated here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotebookQuery {
    unit_id: Option<String>,
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
    q: Option<String>,
}

impl NotebookQuery {
    fn params(&self) -> ListParams {
        let defaults = ListParams::default();
        ListParams {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset,
            q: self.q.clone(),
        }
    }
}

async fn create_notebook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateNotebook>,
) -> Result<(StatusCode, Json<Message>), ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    let nb = state.svc.create_notebook(body)?;
    Ok((StatusCode::CREATED, Json(Message::with_id("notebook created", nb.id))))
}

async fn batch_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<BatchCreate>,
) -> Result<(StatusCode, Json<Message>), ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    let n = state.svc.batch_create_notebooks(body)?;
    Ok((StatusCode::CREATED, Json(Message::new(format!("{} notebooks created", n)))))
}

async fn list_notebooks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NotebookQuery>,
) -> Result<Json<ListResult<Notebook>>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.list_notebooks(query.unit_id.as_deref(), &query.params())?))
}

async fn grouped(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UnitGroup>>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.grouped_notebooks()?))
}

async fn get_notebook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Notebook>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    Ok(Json(state.svc.get_notebook(&id)?))
}

async fn reassign_notebook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ReassignNotebook>,
) -> Result<Json<Message>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    state.svc.reassign_notebook(&id, body)?;
    Ok(Json(Message::new("notebook updated")))
}

async fn delete_notebook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    state.svc.delete_notebook(&id)?;
    Ok(Json(Message::new("notebook deleted")))
}

async fn delete_unit_notebooks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServiceError> {
    state.auth.require(&headers, Area::Records)?;
    let n = state.svc.delete_unit_notebooks(&id)?;
    let message = if n == 0 {
        "no notebooks found for this unit".to_string()
    } else {
        format!("all {} notebooks of the unit were deleted", n)
    };
    Ok(Json(Message::new(message)))
}
