use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::{
    app::build_app,
    state::AppState,
    testing::{send, token_for},
};

fn post(title: &str) -> serde_json::Value {
    json!({"title": title, "body": "lorem ipsum", "userId": 1})
}

#[tokio::test]
async fn every_method_requires_a_token() {
    let app = build_app(AppState::fake());
    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        let (status, _) = send(&app, method, "/post", None, Some(post("title"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn list_is_newest_first() {
    let state = AppState::fake();
    let token = token_for(&state, "alice");
    let app = build_app(state);
    for title in ["first", "second", "third"] {
        let (status, body) = send(&app, Method::POST, "/post", Some(&token), Some(post(title))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_i64().unwrap() > 0);
    }

    let (status, body) = send(&app, Method::GET, "/post", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(body[0]["title"], "third");
}

#[tokio::test]
async fn get_one_missing_and_invalid() {
    let state = AppState::fake();
    let token = token_for(&state, "alice");
    let app = build_app(state);
    send(&app, Method::POST, "/post", Some(&token), Some(post("hello"))).await;

    let (status, body) = send(&app, Method::GET, "/post?id=1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "title": "hello", "body": "lorem ipsum", "userId": 1}));

    let (status, body) = send(&app, Method::GET, "/post?id=9", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");

    let (status, _) = send(&app, Method::GET, "/post?id=-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn short_title_is_rejected_on_create_and_update() {
    let state = AppState::fake();
    let token = token_for(&state, "alice");
    let app = build_app(state);

    let (status, body) = send(&app, Method::POST, "/post", Some(&token), Some(post("ab"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["title"], "title must be at least 3 characters long");

    let (status, body) = send(&app, Method::PUT, "/post", Some(&token), Some(json!({"id": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["title"], "title is required");
}

#[tokio::test]
async fn update_existing_and_missing() {
    let state = AppState::fake();
    let token = token_for(&state, "alice");
    let app = build_app(state);
    send(&app, Method::POST, "/post", Some(&token), Some(post("hello"))).await;

    let changed = json!({"id": 1, "title": "hello again", "body": "new", "userId": 2});
    let (status, body) = send(&app, Method::PUT, "/post", Some(&token), Some(changed.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, changed);

    let (_, body) = send(&app, Method::GET, "/post?id=1", Some(&token), None).await;
    assert_eq!(body["title"], "hello again");

    let missing = json!({"id": 40, "title": "nobody", "body": "", "userId": 1});
    let (status, _) = send(&app, Method::PUT, "/post", Some(&token), Some(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::PUT, "/post", Some(&token), Some(post("no id here"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid post ID");
}

#[tokio::test]
async fn delete_nonexistent_is_404() {
    let state = AppState::fake();
    let token = token_for(&state, "alice");
    let app = build_app(state);

    let (status, body) = send(&app, Method::DELETE, "/post?id=999999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");
}

#[tokio::test]
async fn delete_existing_returns_success_envelope() {
    let state = AppState::fake();
    let token = token_for(&state, "alice");
    let app = build_app(state);
    send(&app, Method::POST, "/post", Some(&token), Some(post("hello"))).await;

    let (status, body) = send(&app, Method::DELETE, "/post?id=1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"completed": true, "message": "Post deleted successfully"}));
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let state = AppState::fake();
    let token = token_for(&state, "alice");
    let app = build_app(state);
    let (status, _) = send(&app, Method::PATCH, "/post", Some(&token), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
