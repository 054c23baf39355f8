mod common;

use axum::http::StatusCode;
use postboard::models::post::{Post, PostWithVotes};
use serde_json::{json, Value};

use common::TestApp;

#[tokio::test]
async fn create_requires_authentication() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/posts/")
        .json(&json!({ "title": "A", "content": "x" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let (name, value) = app.bearer(alice);
    let forged = format!("{}x", value.to_str().unwrap());

    let response = app
        .server
        .get("/posts/1")
        .add_header(name, forged.parse::<axum::http::HeaderValue>().unwrap())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_defaults_published_and_sets_owner() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let (name, value) = app.bearer(alice);

    let response = app
        .server
        .post("/posts/")
        .add_header(name, value)
        .json(&json!({ "title": "A", "content": "x" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let post: Post = response.json();
    assert_eq!(post.owner_id, alice);
    assert!(post.published);
}

#[tokio::test]
async fn missing_fields_are_unprocessable() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let (name, value) = app.bearer(alice);

    let response = app
        .server
        .post("/posts/")
        .add_header(name, value)
        .json(&json!({ "title": "no content" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("missing field `content`"));
}

#[tokio::test]
async fn ownership_scenario() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let (name, alice_auth) = app.bearer(alice);
    let (_, bob_auth) = app.bearer(bob);

    let post: Post = app
        .server
        .post("/posts/")
        .add_header(name.clone(), alice_auth.clone())
        .json(&json!({ "title": "A", "content": "x", "published": true }))
        .await
        .json();
    assert_eq!(post.owner_id, alice);
    let path = format!("/posts/{}", post.id);

    app.server
        .post("/vote/")
        .add_header(name.clone(), bob_auth.clone())
        .json(&json!({ "post_id": post.id, "dir": 1 }))
        .await
        .assert_status(StatusCode::CREATED);

    let seen: PostWithVotes = app
        .server
        .get(&path)
        .add_header(name.clone(), bob_auth.clone())
        .await
        .json();
    assert_eq!(seen.votes, 1);
    assert_eq!(seen.post, post);

    let forbidden = app
        .server
        .put(&path)
        .add_header(name.clone(), bob_auth.clone())
        .json(&json!({ "title": "B", "content": "y" }))
        .await;
    forbidden.assert_status(StatusCode::FORBIDDEN);

    app.server
        .delete(&path)
        .add_header(name.clone(), bob_auth)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let deleted = app
        .server
        .delete(&path)
        .add_header(name.clone(), alice_auth.clone())
        .await;
    deleted.assert_status(StatusCode::NO_CONTENT);
    assert!(deleted.as_bytes().is_empty());

    let gone = app.server.get(&path).add_header(name, alice_auth).await;
    gone.assert_status(StatusCode::NOT_FOUND);
    let body: Value = gone.json();
    assert!(body["detail"].as_str().unwrap().contains("was not found"));
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let (name, value) = app.bearer(alice);

    let post: Post = app
        .server
        .post("/posts/")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "title": "A", "content": "x", "published": false }))
        .await
        .json();

    let response = app
        .server
        .put(&format!("/posts/{}", post.id))
        .add_header(name, value)
        .json(&json!({ "title": "B", "content": "y" }))
        .await;

    response.assert_status_ok();
    let updated: Post = response.json();
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.title, "B");
    assert_eq!(updated.content, "y");
    assert!(updated.published, "omitted published resets to its default");
}

#[tokio::test]
async fn mutating_missing_post_is_not_found() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let (name, value) = app.bearer(alice);

    app.server
        .put("/posts/99")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "title": "B", "content": "y" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete("/posts/99")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_public_filtered_and_paginated() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let (name, value) = app.bearer(alice);

    for title in ["hello one", "other", "hello two", "hello three"] {
        app.server
            .post("/posts")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "title": title, "content": "x" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let first: Vec<PostWithVotes> = app
        .server
        .get("/posts/")
        .add_query_param("search", "hello")
        .add_query_param("limit", 2)
        .add_query_param("skip", 0)
        .await
        .json();
    let titles: Vec<_> = first.iter().map(|p| p.post.title.as_str()).collect();
    assert_eq!(titles, vec!["hello one", "hello two"]);
    assert!(first.iter().all(|p| p.votes == 0));

    let rest: Vec<PostWithVotes> = app
        .server
        .get("/posts/")
        .add_query_param("search", "hello")
        .add_query_param("limit", 2)
        .add_query_param("skip", 2)
        .await
        .json();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].post.title, "hello three");

    let everything: Vec<PostWithVotes> = app.server.get("/posts").await.json();
    assert_eq!(everything.len(), 4);
}

#[tokio::test]
async fn negative_limit_is_a_bad_request() {
    let app = TestApp::new().await;

    let response = app.server.get("/posts/").add_query_param("limit", -1).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let (name, value) = app.bearer(alice);

    let response = app.server.get("/posts/abc").add_header(name, value).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.header("content-type"), "application/json");
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("abc"));
}
