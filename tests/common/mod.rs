//! Stand-in for the remote generation service.

#![allow(dead_code)]

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use ui_forge::config::ServiceConfig;
use ui_forge::service::ServiceEndpoints;

pub const GOOD_TOKEN: &str = "good-token";
pub const PASSWORD: &str = "secret";

/// Prompt that makes the fake answer with an `error` body.
pub const FAILING_PROMPT: &str = "please fail";
/// Prompt that makes the fake answer with an undecodable `result`.
pub const GARBLED_PROMPT: &str = "please garble";
/// Prompt that makes the fake take a while before answering.
pub const SLOW_PROMPT: &str = "please wait";

#[derive(Deserialize)]
struct GeneratePayload {
    prompt: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterPayload {
    username: String,
    #[serde(default)]
    email: Option<String>,
}

async fn generate(headers: HeaderMap, Json(payload): Json<GeneratePayload>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {GOOD_TOKEN}"));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid token" })));
    }

    match payload.prompt.as_str() {
        FAILING_PROMPT => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Model overloaded" })),
        ),
        GARBLED_PROMPT => (StatusCode::OK, Json(json!({ "result": "not json at all" }))),
        prompt => {
            if prompt == SLOW_PROMPT {
                tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            }
            let result = json!({
                "html": format!("<button>{prompt}</button>"),
                "css": "button{color:blue}",
            });
            (StatusCode::OK, Json(json!({ "result": result.to_string() })))
        }
    }
}

async fn login(Json(payload): Json<LoginPayload>) -> (StatusCode, Json<Value>) {
    if payload.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid username or password" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "user": { "username": payload.username, "email": "ada@example.com" },
            "token": GOOD_TOKEN,
        })),
    )
}

async fn register(Json(payload): Json<RegisterPayload>) -> (StatusCode, Json<Value>) {
    if payload.username == "taken" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Username already exists" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "email": payload.email })),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn fake_service() -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/health", get(health))
}

/// Serve the fake on an ephemeral port and return its base URL.
pub async fn spawn_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake service");
    let address = listener.local_addr().expect("fake service address");
    tokio::spawn(async move {
        axum::serve(listener, fake_service())
            .await
            .expect("fake service");
    });
    format!("http://{address}")
}

/// Base URL on which nothing is listening.
pub async fn dead_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let address = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{address}")
}

pub fn endpoints(base_url: &str) -> ServiceEndpoints {
    ServiceEndpoints::from_config(&ServiceConfig {
        base_url: base_url.to_string(),
        generate_path: "/generate".to_string(),
        login_path: "/login".to_string(),
        register_path: "/register".to_string(),
        health_path: "/health".to_string(),
    })
    .expect("valid endpoints")
}

pub fn url(base_url: &str, path: &str) -> Url {
    Url::parse(&format!("{base_url}{path}")).expect("valid url")
}
