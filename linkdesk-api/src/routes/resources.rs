/// Generic CRUD endpoints
///
/// One set of handlers, monomorphized per record type and nested once per
/// resource root in the router. All four resources share status mapping:
///
/// - `GET /{resource}` → 200 array
/// - `GET /{resource}/{id}` → 200 object, 404 when absent or malformed id
/// - `POST /{resource}` → 201 created object, 422 with the violation list
/// - `PATCH /{resource}/{id}` → 200 merged object, 404
/// - `DELETE /{resource}/{id}` → 200 `{"success": true}`, 404 (a repeated
///   delete of the same id fails even though the end state is identical)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use linkdesk_shared::repository::{Resource, ResourceRepository};
use serde_json::{json, Value as JsonValue};

use crate::{app::AppState, error::ApiResult};

/// Builds the router for one resource root.
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/:id",
            get(fetch::<R>).patch(update::<R>).delete(remove::<R>),
        )
}

fn repository<R: Resource>(state: &AppState) -> ResourceRepository<R> {
    ResourceRepository::new(state.store.clone())
}

async fn list<R: Resource>(State(state): State<AppState>) -> ApiResult<Json<Vec<R>>> {
    Ok(Json(repository::<R>(&state).list().await?))
}

async fn fetch<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<R>> {
    Ok(Json(repository::<R>(&state).get(&id).await?))
}

async fn create<R: Resource>(
    State(state): State<AppState>,
    Json(input): Json<R::Create>,
) -> ApiResult<(StatusCode, Json<R>)> {
    let created = repository::<R>(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<JsonValue>,
) -> ApiResult<Json<R>> {
    Ok(Json(repository::<R>(&state).update(&id, patch).await?))
}

async fn remove<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JsonValue>> {
    repository::<R>(&state).delete(&id).await?;
    Ok(Json(json!({ "success": true })))
}
