use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::SqlitePool;

use crate::auth::token::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::User;

/// Rejects requests without a valid bearer token and attaches the resolved
/// `User` to the request extensions for `AuthenticatedUser` to pick up.
///
/// Expects `web::Data<SqlitePool>` and `web::Data<Config>` to be registered.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let user = resolve_principal(&req).await?;
            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
///
/// A missing header, another scheme and an empty token are all `None`.
pub fn bearer_token(value: Option<&str>) -> Option<&str> {
    value
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn resolve_principal(req: &ServiceRequest) -> Result<User, AppError> {
    let token = bearer_token(
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok()),
    )
    .ok_or_else(|| AppError::Unauthorized("Token is missing".into()))?;

    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| AppError::Internal("Config is not registered".into()))?;
    let pool = req
        .app_data::<web::Data<SqlitePool>>()
        .ok_or_else(|| AppError::Internal("Database pool is not registered".into()))?;

    let user_id = verify_token(token, &config.jwt_secret).map_err(|err| {
        log::debug!("Rejected token on {}: {}", req.path(), err);
        err
    })?;

    User::find_by_id(pool.get_ref(), user_id)
        .await?
        .ok_or_else(|| {
            log::warn!("Token references missing user {}", user_id);
            AppError::Unauthorized("User not found".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(None), None);
        assert_eq!(bearer_token(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("Bearer    ")), None);
        assert_eq!(bearer_token(Some("abc.def.ghi")), None);
    }
}
