use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};

use crate::error::AppError;
use crate::models::{Tag, TagInput};
use crate::queries::tags as queries;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", post(create_tag).get(list_tags))
        .route("/tags/{id}", put(update_tag).delete(delete_tag))
        .route(
            "/bookmarks/{id}/tags/{tag_id}",
            post(attach_tag).delete(detach_tag),
        )
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = queries::list_tags(&state.db).await?;
    Ok(Json(tags))
}

async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<TagInput>,
) -> Result<Json<Tag>, AppError> {
    let tag = queries::insert_tag(&state.db, input.name.as_str(), input.variant()).await?;
    tracing::info!(id = tag.id, "created tag");

    state.cache.schedule_refresh();
    Ok(Json(tag))
}

async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TagInput>,
) -> Result<StatusCode, AppError> {
    queries::update_tag(&state.db, id, input.name.as_str(), input.variant()).await?;

    state.cache.schedule_refresh();
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_tag(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    queries::delete_tag(&state.db, id).await?;

    state.cache.schedule_refresh();
    Ok(StatusCode::NO_CONTENT)
}

async fn attach_tag(
    State(state): State<AppState>,
    Path((bookmark_id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    queries::attach_tag(&state.db, bookmark_id, tag_id).await?;
    tracing::info!(bookmark_id, tag_id, "tagged bookmark");

    state.cache.schedule_refresh();
    Ok(StatusCode::NO_CONTENT)
}

async fn detach_tag(
    State(state): State<AppState>,
    Path((bookmark_id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    queries::detach_tag(&state.db, bookmark_id, tag_id).await?;

    state.cache.schedule_refresh();
    Ok(StatusCode::NO_CONTENT)
}
