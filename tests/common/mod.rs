#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use tasklist::auth::API_KEY_HEADER;
use tasklist::config::Config;
use tasklist::{db, routes, AppState};

pub const API_KEY: &str = "test-api-key";
pub const JWT_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        // One connection keeps the in-memory database alive between requests.
        database_max_connections: 1,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_algorithm: Algorithm::HS256,
        token_ttl_minutes: 30,
        api_key: API_KEY.to_string(),
        bcrypt_cost: 4,
    }
}

/// A fresh app over its own empty in-memory database.
pub async fn init_app() -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let config = test_config();
    let pool = db::connect(&config)
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    init_app_with_pool(&config, pool).await
}

/// An app over a pool the caller prepared.
pub async fn init_app_with_pool(
    config: &Config,
    pool: SqlitePool,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let state = AppState::new(config, pool).expect("Failed to build application state");
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::config),
    )
    .await
}

/// Sends a request and returns the status with the body parsed as JSON.
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    req: Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            panic!(
                "Response body is not JSON: {:?}",
                String::from_utf8_lossy(&body_bytes)
            )
        })
    };
    (status, body)
}

pub async fn signup(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    username: &str,
    password: &str,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({"username": username, "password": password}))
        .to_request();
    send(app, req).await
}

pub async fn request_token(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    username: &str,
    password: &str,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/token")
        .set_json(json!({"username": username, "password": password}))
        .to_request();
    send(app, req).await
}

/// Signs a user up and returns a bearer token for them.
pub async fn register_and_login(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    username: &str,
    password: &str,
) -> String {
    let (status, body) = signup(app, username, password).await;
    assert_eq!(status, StatusCode::CREATED, "Signup failed: {}", body);

    let (status, body) = request_token(app, username, password).await;
    assert_eq!(status, StatusCode::OK, "Login failed: {}", body);
    body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Adds both credentials required on task routes.
pub fn authorized(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header((API_KEY_HEADER, API_KEY))
}

pub async fn create_task(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    token: &str,
    title: &str,
    description: &str,
) -> Value {
    let req = authorized(test::TestRequest::post().uri("/tasks"), token)
        .set_json(json!({"title": title, "description": description}))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "Create task failed: {}", body);
    body
}
