use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::SqlitePool;

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::User;
use crate::store::users;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves the bearer token of every request it wraps to a stored [`User`].
///
/// On success the user is inserted into the request extensions, where the
/// `CurrentUser` extractor picks it up. On failure the request never reaches the
/// handler and the error is rendered as the response.
///
/// Requires `web::Data<TokenService>` and `web::Data<SqlitePool>` in the app data.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    log::warn!("rejected {} {}: {}", req.method(), req.path(), err);
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header_value)?;

    let (tokens, pool) = match (
        req.app_data::<web::Data<TokenService>>(),
        req.app_data::<web::Data<SqlitePool>>(),
    ) {
        (Some(tokens), Some(pool)) => (tokens, pool),
        _ => {
            return Err(AppError::Internal(
                "Authentication is not configured".into(),
            ))
        }
    };

    let user_id = tokens
        .verify(token)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User no longer exists".into()))
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme must be exactly `Bearer` followed by a single space.
pub fn bearer_token(header_value: Option<&str>) -> Result<&str, AppError> {
    header_value
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".into()))
}
