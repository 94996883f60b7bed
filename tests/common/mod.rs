#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bookmarks::cache::BookmarkCache;
use bookmarks::config::{Config, ListOrder};
use bookmarks::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use bookmarks::db::connect_options;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::PathBuf;

pub const TOKEN: &str = "test-token";

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub cache: BookmarkCache,
}

pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options("sqlite::memory:").unwrap())
        .await
        .expect("Failed to create in-memory SQLite pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A file-backed pool with several connections, for tests that need writers
/// to actually overlap. Remove the returned path when done.
pub async fn file_pool(name: &str, connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("bookmarks-{}-{name}.db", std::process::id()));
    std::fs::remove_file(&path).ok();

    let pool = SqlitePoolOptions::new()
        .max_connections(connections)
        .connect_with(connect_options(&format!("sqlite:{}", path.display())).unwrap())
        .await
        .expect("Failed to create file-backed SQLite pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, path)
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        token: TOKEN.to_string(),
        production: false,
        database_url: "sqlite::memory:".to_string(),
        list_order: ListOrder::NewestFirst,
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let pool = memory_pool().await;
        Self::with_pool(pool, config).await
    }

    /// Build the app on a pool that may already hold data.
    pub async fn with_pool(pool: SqlitePool, config: Config) -> Self {
        let state = AppState::new(pool.clone(), config)
            .await
            .expect("Failed to build app state");
        let cache = state.cache.clone();
        let router = bookmarks::build_app(state);

        Self {
            router,
            db: pool,
            cache,
        }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    /// Send a request with an optional bearer token and JSON body.
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(req).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send("GET", uri, Some(TOKEN), None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send("POST", uri, Some(TOKEN), Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response {
        self.send("PUT", uri, Some(TOKEN), Some(body)).await
    }

    pub async fn put(&self, uri: &str) -> Response {
        self.send("PUT", uri, Some(TOKEN), None).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send("DELETE", uri, Some(TOKEN), None).await
    }

    /// Create a bookmark over HTTP and return its JSON.
    pub async fn create_bookmark(&self, name: &str, href: &str) -> Value {
        let resp = self
            .post_json("/bookmarks", serde_json::json!({ "name": name, "href": href }))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    /// Wait for background cache refreshes, then list bookmarks.
    pub async fn settled_list(&self) -> Vec<Value> {
        self.cache.wait_idle().await;
        let resp = self.get("/bookmarks").await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await.as_array().unwrap().clone()
    }

    pub async fn link_count(&self) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookmark_tag")
            .fetch_one(&self.db)
            .await
            .unwrap();
        count.0
    }

    pub async fn bookmark_count(&self) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookmark")
            .fetch_one(&self.db)
            .await
            .unwrap();
        count.0
    }
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
}
