//! Shared setup for the integration tests: an app wired to `MemoryStore`, plus request
//! helpers that return the status and the decoded envelope.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use todo_app::auth::{PasswordHasher, TokenService};
use todo_app::routes;
use todo_app::state::AppState;
use todo_app::store::MemoryStore;

pub const SECRET: &[u8] = b"integration-test-secret";

pub fn state() -> web::Data<AppState> {
    state_with_ownership(true)
}

pub fn state_with_ownership(enforce: bool) -> web::Data<AppState> {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        TokenService::new(SECRET),
        // cheapest cost bcrypt allows, keeps the suite fast
        PasswordHasher::new(4),
    )
    .with_task_ownership(enforce);
    web::Data::new(state)
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(routes::config(state)),
    )
    .await
}

/// Sends `req` and returns the status with the JSON body (`Value::Null` if not JSON).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub fn with_token(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, token.to_string()))
}

pub async fn register<S, B>(app: &S, name: &str, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": password,
            "confirm_password": password
        }))
        .to_request();
    send(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

/// Registers and logs in, returning the new user's id and token.
pub async fn register_and_login<S, B>(app: &S, email: &str, password: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = register(app, "Test User", email, password).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let id = body["data"]["id"].as_i64().expect("user id");

    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    let token = body["data"]["token"].as_str().expect("token").to_string();

    (id, token)
}

pub async fn create_task<S, B>(app: &S, token: &str, task: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = with_token(test::TestRequest::post().uri("/tasks/"), token)
        .set_json(task)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}
