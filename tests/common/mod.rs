#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::json;
use sqlx::SqlitePool;
use taskdesk::auth::{LoginResponse, PasswordHasher, SignupResponse, TokenService};
use taskdesk::{db, routes};
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

pub async fn test_pool() -> SqlitePool {
    db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

pub async fn init_app(
    pool: SqlitePool,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(TokenService::new(SECRET, Duration::minutes(30))))
            .app_data(web::Data::new(PasswordHasher::new(4)))
            .configure(routes::config),
    )
    .await
}

pub async fn signup_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({"name": "Test User", "email": email, "password": password}))
        .to_request();
    let signup: SignupResponse = test::call_and_read_body_json(app, req).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email": email, "password": password}))
        .to_request();
    let login: LoginResponse = test::call_and_read_body_json(app, req).await;

    TestUser {
        id: signup.user_id,
        token: login.token,
    }
}

pub fn bearer(user: &TestUser) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", user.token))
}
