//! In-process stand-in for the placeholder blog API.
//!
//! Mirrors the remote service's echo behaviour: writes are answered with
//! the submitted payload plus an id and nothing is stored.

#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};

/// Handle to a running stub; the server lives until the test runtime ends.
pub struct StubApi {
    /// Base URL with trailing slash, e.g. `http://127.0.0.1:41234/`.
    pub base_url: String,
}

/// Starts the stub on an ephemeral local port.
pub async fn spawn_stub_api() -> StubApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        axum::serve(listener, router()).await.expect("stub server");
    });

    StubApi {
        base_url: format!("http://{addr}/"),
    }
}

/// How long `/slow` waits before answering.
pub const SLOW_ROUTE_DELAY: Duration = Duration::from_millis(500);

/// Returns a base URL on which nothing is listening.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}/")
}

fn router() -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{id}/comments", get(list_post_comments).post(create_comment))
        .route("/comments", get(list_comments))
        .route("/broken", get(broken))
        .route("/html", get(html))
        .route("/slow", get(slow))
}

fn posts() -> Vec<Value> {
    vec![
        json!({"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"}),
        json!({"userId": 1, "id": 2, "title": "qui est esse", "body": "est rerum tempore"}),
    ]
}

fn comments() -> Vec<Value> {
    vec![
        json!({"postId": 1, "id": 1, "name": "id labore ex", "email": "Eliseo@gardner.biz", "body": "laudantium enim"}),
        json!({"postId": 1, "id": 2, "name": "quo vero", "email": "Jayne_Kuhic@sydney.com", "body": "est natus enim"}),
        json!({"postId": 2, "id": 6, "name": "et fugit", "email": "Presley.Mueller@myrl.com", "body": "doloribus at sed"}),
    ]
}

fn with_field(mut payload: Value, key: &str, value: Value) -> Value {
    if let Some(object) = payload.as_object_mut() {
        object.insert(key.to_string(), value);
    }
    payload
}

async fn list_posts() -> Json<Vec<Value>> {
    Json(posts())
}

async fn get_post(Path(id): Path<u64>) -> impl IntoResponse {
    posts()
        .into_iter()
        .find(|p| p["id"] == id)
        .map_or_else(
            || (StatusCode::NOT_FOUND, Json(json!({}))),
            |post| (StatusCode::OK, Json(post)),
        )
}

async fn create_post(Json(payload): Json<Value>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(with_field(payload, "id", json!(101))))
}

async fn update_post(Path(id): Path<u64>, Json(payload): Json<Value>) -> Json<Value> {
    Json(with_field(payload, "id", json!(id)))
}

async fn delete_post(Path(_id): Path<u64>) -> Json<Value> {
    Json(json!({}))
}

async fn list_post_comments(Path(id): Path<u64>) -> Json<Vec<Value>> {
    Json(comments().into_iter().filter(|c| c["postId"] == id).collect())
}

async fn create_comment(Path(_id): Path<u64>, Json(payload): Json<Value>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(with_field(payload, "id", json!(501))))
}

async fn list_comments(Query(params): Query<HashMap<String, String>>) -> Json<Vec<Value>> {
    let post_id = params.get("postId").and_then(|v| v.parse::<u64>().ok());
    Json(
        comments()
            .into_iter()
            .filter(|c| post_id.is_none_or(|id| c["postId"] == id))
            .collect(),
    )
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_ROUTE_DELAY).await;
    Json(json!({"title": "late"}))
}

async fn html() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], "<html><body>not json</body></html>")
}
