mod common;

use axum::http::StatusCode;
use common::{body_string, TestApp, TOKEN};
use serde_json::json;

async fn assert_challenge(resp: axum::response::Response) {
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let challenge = resp
        .headers()
        .get("www-authenticate")
        .expect("Expected WWW-Authenticate header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(challenge.starts_with("Bearer"));
    assert_eq!(body_string(resp).await, "Unauthorized.");
}

#[tokio::test]
async fn missing_token_is_challenged() {
    let app = TestApp::new().await;
    let resp = app.send("GET", "/bookmarks", None, None).await;
    assert_challenge(resp).await;
}

#[tokio::test]
async fn wrong_token_is_challenged() {
    let app = TestApp::new().await;
    let resp = app.send("GET", "/bookmarks", Some("not-the-token"), None).await;
    assert_challenge(resp).await;
}

#[tokio::test]
async fn near_miss_tokens_are_challenged() {
    let app = TestApp::new().await;
    let prefix = &TOKEN[..TOKEN.len() - 1];
    let longer = format!("{TOKEN}x");
    let recased = TOKEN.to_uppercase();

    for token in [prefix, longer.as_str(), recased.as_str()] {
        let resp = app.send("GET", "/bookmarks", Some(token), None).await;
        assert_challenge(resp).await;
    }
}

#[tokio::test]
async fn non_bearer_scheme_is_challenged() {
    let app = TestApp::new().await;
    let req = axum::http::Request::builder()
        .uri("/bookmarks")
        .header("authorization", format!("Basic {TOKEN}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = app.request(req).await;
    assert_challenge(resp).await;
}

#[tokio::test]
async fn unauthenticated_writes_never_reach_storage() {
    let app = TestApp::new().await;
    let body = json!({ "name": "sneaky", "href": "https://example.com" });

    assert_challenge(app.send("POST", "/bookmarks", None, Some(body.clone())).await).await;
    assert_challenge(app.send("PUT", "/bookmarks", None, Some(body.clone())).await).await;
    assert_challenge(app.send("PUT", "/bookmarks/1", None, Some(body)).await).await;
    assert_challenge(app.send("PUT", "/bookmarks/1/check/true", None, None).await).await;
    assert_challenge(app.send("DELETE", "/bookmarks/1", None, None).await).await;
    assert_challenge(app.send("POST", "/tags", None, Some(json!({ "name": "t" }))).await).await;
    assert_challenge(app.send("POST", "/bookmarks/1/tags/1", None, None).await).await;

    assert_eq!(app.bookmark_count().await, 0);
}

#[tokio::test]
async fn auth_runs_before_validation() {
    let app = TestApp::new().await;
    // Malformed id and body would be a 4xx of their own; the challenge wins.
    let resp = app
        .send("PUT", "/bookmarks/not-a-number", None, Some(json!({ "name": "" })))
        .await;
    assert_challenge(resp).await;
}

#[tokio::test]
async fn valid_token_is_accepted() {
    let app = TestApp::new().await;
    let resp = app.get("/bookmarks").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "[]");
}
