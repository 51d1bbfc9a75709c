use crate::{
    auth::{LoginRequest, LoginResponse, PasswordHasher, SignupRequest, SignupResponse, TokenService},
    error::AppError,
    models::NewUser,
    store::users,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Runs CPU-heavy password work off the async workers.
async fn blocking<F, T>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Password worker failed: {}", e)))?
}

/// Register a new user
///
/// Stores the account with a hashed password. Responds `201` with the new user's id,
/// or `400` when the email is already registered.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<SqlitePool>,
    hasher: web::Data<PasswordHasher>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let SignupRequest {
        name,
        email,
        password,
    } = signup_data.into_inner();

    let hasher = *hasher.get_ref();
    let password_hash = blocking(move || hasher.hash(&password)).await?;

    let user = users::create(
        &pool,
        NewUser {
            name,
            email,
            password_hash,
        },
    )
    .await?;

    log::info!("user {} signed up", user.id);

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User created successfully".into(),
        user_id: user.id,
    }))
}

/// Login user
///
/// Exchanges email and password for a bearer token. Unknown emails and wrong
/// passwords get the same `401`.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let LoginRequest { email, password } = login_data.into_inner();
    let invalid_credentials = || AppError::Unauthorized("Invalid email or password".into());

    let user = match users::find_by_email(&pool, &email).await? {
        Some(user) => user,
        None => {
            log::info!("login failed: unknown email");
            return Err(invalid_credentials());
        }
    };

    let hasher = *hasher.get_ref();
    let digest = user.password_hash.clone();
    if !blocking(move || hasher.verify(&password, &digest)).await? {
        log::info!("login failed for user {}: wrong password", user.id);
        return Err(invalid_credentials());
    }

    let token = tokens.issue(user.id)?;
    Ok(HttpResponse::Ok().json(LoginResponse::bearer(token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Duration;
    use serde_json::json;

    #[actix_rt::test]
    async fn test_signup_then_login() {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(PasswordHasher::new(4)))
                .app_data(web::Data::new(TokenService::new("secret", Duration::minutes(30))))
                .service(signup)
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"name": "Ana", "email": "ana@example.com", "password": "hunter22"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": "ana@example.com", "password": "hunter22"}))
            .to_request();
        let body: LoginResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.token_type, "bearer");
        assert!(!body.token.is_empty());

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": "nobody@example.com", "password": "hunter22"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_signup_rejects_missing_fields() {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(PasswordHasher::new(4)))
                .service(signup),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"email": "ana@example.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
