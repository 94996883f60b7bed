pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod queries;
pub mod routes;
pub mod timing;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::cache::BookmarkCache;
use crate::config::Config;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub cache: BookmarkCache,
    pub config: Arc<Config>,
}

impl AppState {
    /// Assemble shared state, filling the bookmark cache from `db` first.
    pub async fn new(db: SqlitePool, config: Config) -> Result<Self, AppError> {
        let cache = BookmarkCache::load(db.clone(), config.list_order).await?;
        Ok(Self {
            db,
            cache,
            config: Arc::new(config),
        })
    }
}

async fn root() -> &'static str {
    "Bookmarks API is up."
}

async fn health() -> &'static str {
    "ok"
}

/// Build the full Axum application router.
///
/// Caller is responsible for running database migrations on the pool inside
/// `state` beforehand.
pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(routes::bookmarks::router())
        .merge(routes::tags::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(middleware::from_fn_with_state(state.clone(), timing::record_timing)),
        )
        .with_state(state)
}
