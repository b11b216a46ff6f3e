use crate::{
    auth::{self, AuthResponse, RegisterResponse},
    config::Config,
    error::AppError,
    models::{LoginInput, RegisterInput},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{message, user}`.
/// - `400 Bad Request`: username, email or password missing or empty.
/// - `409 Conflict`: username or email already taken.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    register_data: web::Json<RegisterInput>,
) -> Result<impl Responder, AppError> {
    let user = auth::register(&pool, &config, register_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".into(),
        user,
    }))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{message, token, user}`.
/// - `400 Bad Request`: username or password missing or empty.
/// - `401 Unauthorized`: unknown username or wrong password.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    login_data: web::Json<LoginInput>,
) -> Result<impl Responder, AppError> {
    let (token, user) = auth::authenticate(&pool, &config, login_data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        token,
        user,
    }))
}
