use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Bookmark, BookmarkFilter, BookmarkInput, Upserted};
use crate::queries::bookmarks as queries;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    q: Option<String>,
    finished: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/bookmarks",
            get(list_bookmarks).post(create_bookmark).put(upsert_bookmark),
        )
        .route("/bookmarks/{id}", put(update_bookmark).delete(delete_bookmark))
        .route("/bookmarks/{id}/check/{finished}", put(check_bookmark))
}

/// Unfiltered lists come from the cache; any filter goes to the store.
async fn list_bookmarks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let filter = BookmarkFilter::new(query.q, query.finished);

    if filter.is_empty() {
        let snapshot = state.cache.snapshot();
        return Ok(Json(snapshot.as_slice()).into_response());
    }

    let order = state.config.list_order;
    let bookmarks = queries::search_bookmarks(&state.db, &filter, order).await?;
    let bookmarks = queries::with_tags(&state.db, bookmarks).await?;

    Ok(Json(bookmarks).into_response())
}

async fn create_bookmark(
    State(state): State<AppState>,
    Json(input): Json<BookmarkInput>,
) -> Result<Json<Bookmark>, AppError> {
    let bookmark = queries::insert_bookmark(&state.db, input.name.as_str(), input.href.as_str()).await?;
    tracing::info!(id = bookmark.id, "created bookmark");

    state.cache.schedule_refresh();
    Ok(Json(bookmark))
}

async fn upsert_bookmark(
    State(state): State<AppState>,
    Json(input): Json<BookmarkInput>,
) -> Result<Json<Upserted>, AppError> {
    let upserted = queries::upsert_bookmark(&state.db, input.name.as_str(), input.href.as_str()).await?;
    tracing::info!(id = upserted.id, created = upserted.created, "upserted bookmark");

    state.cache.schedule_refresh();
    Ok(Json(upserted))
}

async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<BookmarkInput>,
) -> Result<StatusCode, AppError> {
    let affected = queries::update_bookmark(&state.db, id, input.name.as_str(), input.href.as_str()).await?;
    if affected == 0 {
        tracing::debug!(id, "update matched no bookmark");
    }

    state.cache.schedule_refresh();
    Ok(StatusCode::NO_CONTENT)
}

async fn check_bookmark(
    State(state): State<AppState>,
    Path((id, finished)): Path<(i64, bool)>,
) -> Result<StatusCode, AppError> {
    let affected = queries::set_finished(&state.db, id, finished).await?;
    if affected == 0 {
        tracing::debug!(id, "check matched no bookmark");
    }

    state.cache.schedule_refresh();
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let affected = queries::delete_bookmark(&state.db, id).await?;
    if affected == 0 {
        tracing::debug!(id, "delete matched no bookmark");
    }

    state.cache.schedule_refresh();
    Ok(StatusCode::NO_CONTENT)
}
