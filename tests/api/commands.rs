use crate::helpers::{spawn_app, spawn_app_with_clock};
use chrono::{Duration, Utc};
use claims::{assert_none, assert_some};
use commander::auth::ManualClock;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

fn new_command() -> Value {
    json!({
        "howTo": "Run the test suite",
        "line": "cargo test",
        "platform": "Rust"
    })
}

#[tokio::test]
async fn every_command_route_requires_a_token() {
    let app = spawn_app().await;
    let body = new_command();
    let routes = vec![
        (Method::GET, "/api/commands", None),
        (Method::GET, "/api/commands/0", None),
        (Method::POST, "/api/commands", Some(&body)),
        (Method::PUT, "/api/commands/0", Some(&body)),
        (Method::DELETE, "/api/commands/0", None),
    ];

    for (method, path, body) in routes {
        let response = app.request(method.clone(), path, None, body).await;
        assert_eq!(
            response.status().as_u16(),
            401,
            "{} {} should require a bearer token",
            method,
            path
        );
    }

    // Nothing was deleted by the rejected requests.
    let token = app.token_for("admin", "pass").await;
    assert_eq!(app.get("/api/commands/0", Some(&token)).await.status().as_u16(), 200);
}

#[tokio::test]
async fn bad_tokens_get_one_uniform_answer() {
    let app = spawn_app().await;
    let token = app.token_for("user", "pass").await;
    let mut parts: Vec<String> = token.split('.').map(String::from).collect();
    let flipped = if parts[1].ends_with('A') { 'B' } else { 'A' };
    parts[1].pop();
    parts[1].push(flipped);
    let tampered = parts.join(".");

    let mut bodies = Vec::new();
    for bad in ["garbage", "a.b.c", tampered.as_str()] {
        let response = app.get("/api/commands", Some(bad)).await;
        assert_eq!(response.status().as_u16(), 401, "{bad:?} should be rejected");
        assert_some!(response.headers().get("www-authenticate"));
        bodies.push(response.json::<Value>().await.unwrap());
    }

    assert!(bodies.iter().all(|b| b == &bodies[0]));
    assert_eq!(
        bodies[0],
        json!({ "error": "unauthorized", "message": "Unauthorized" })
    );
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = spawn_app_with_clock(clock.clone()).await;
    let token = app.token_for("admin", "pass").await;

    clock.advance(Duration::hours(23));
    assert_eq!(app.get("/api/commands", Some(&token)).await.status().as_u16(), 200);

    clock.advance(Duration::hours(1));
    let response = app.get("/api/commands", Some(&token)).await;
    assert_eq!(response.status().as_u16(), 401);

    // A fresh login works again.
    let fresh = app.token_for("admin", "pass").await;
    assert_eq!(app.get("/api/commands", Some(&fresh)).await.status().as_u16(), 200);
}

#[tokio::test]
async fn list_returns_the_seeded_commands() {
    let app = spawn_app().await;
    let token = app.token_for("user", "pass").await;

    let response = app.get("/api/commands", Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let commands: Vec<Value> = response.json().await.unwrap();
    assert_eq!(commands.len(), 3);
    assert_eq!(
        commands[0],
        json!({ "id": 0, "howTo": "First command", "line": "Item1" })
    );
    assert_none!(commands[0].get("platform"));
}

#[tokio::test]
async fn unknown_ids_are_404() {
    let app = spawn_app().await;
    let token = app.token_for("admin", "pass").await;

    let get = app.get("/api/commands/999", Some(&token)).await;
    assert_eq!(get.status().as_u16(), 404);
    let body: Value = get.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let put = app
        .request(Method::PUT, "/api/commands/999", Some(&token), Some(&new_command()))
        .await;
    assert_eq!(put.status().as_u16(), 404);

    let delete = app
        .request(Method::DELETE, "/api/commands/999", Some(&token), None)
        .await;
    assert_eq!(delete.status().as_u16(), 404);
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let app = spawn_app().await;
    let token = app.token_for("admin", "pass").await;

    let created = app
        .request(Method::POST, "/api/commands", Some(&token), Some(&new_command()))
        .await;
    assert_eq!(created.status().as_u16(), 201);
    let location = created.headers()["location"].to_str().unwrap().to_owned();
    let created: Value = created.json().await.unwrap();
    assert_eq!(created["howTo"], "Run the test suite");
    let id = created["id"].as_i64().unwrap();
    assert_eq!(location, format!("/api/commands/{}", id));

    let fetched: Value = app.get(&location, Some(&token)).await.json().await.unwrap();
    assert_eq!(fetched, created);

    let changes = json!({
        "howTo": "Run only unit tests",
        "line": "cargo test --lib",
        "platform": "Rust"
    });
    let updated = app
        .request(Method::PUT, &location, Some(&token), Some(&changes))
        .await;
    assert_eq!(updated.status().as_u16(), 204);
    let fetched: Value = app.get(&location, Some(&token)).await.json().await.unwrap();
    assert_eq!(fetched["line"], "cargo test --lib");

    let deleted = app
        .request(Method::DELETE, &location, Some(&token), None)
        .await;
    assert_eq!(deleted.status().as_u16(), 204);
    assert_eq!(app.get(&location, Some(&token)).await.status().as_u16(), 404);
}

#[tokio::test]
async fn invalid_command_bodies_are_400() {
    let app = spawn_app().await;
    let token = app.token_for("admin", "pass").await;
    let test_cases = vec![
        (json!({ "howTo": "", "line": "ls", "platform": "Linux" }), "empty howTo"),
        (json!({ "howTo": "x".repeat(251), "line": "ls", "platform": "Linux" }), "howTo too long"),
        (json!({ "howTo": "List", "line": "", "platform": "Linux" }), "empty line"),
        (json!({ "howTo": "List", "line": "ls" }), "missing platform"),
    ];

    for (body, description) in test_cases {
        let response = app
            .request(Method::POST, "/api/commands", Some(&token), Some(&body))
            .await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not fail with 400 Bad Request when the payload had {}.",
            description
        );
    }

    let commands: Vec<Value> = app.get("/api/commands", Some(&token)).await.json().await.unwrap();
    assert_eq!(commands.len(), 3);
}
