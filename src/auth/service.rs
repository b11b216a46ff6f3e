//! Registration and login.

use actix_web::web;
use sqlx::SqlitePool;
use validator::Validate;

use super::password::{hash_password, verify_password};
use super::token::generate_token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{LoginInput, RegisterInput, User};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Creates a new account.
///
/// The password is hashed before the store is touched, on the blocking pool.
/// The username and email checks only pick the error message; two concurrent
/// registrations of the same name are settled by the unique constraints, which
/// surface as `Conflict` too.
pub async fn register(pool: &SqlitePool, config: &Config, input: RegisterInput) -> Result<User, AppError> {
    let (username, email, password) = match (input.validate(), input) {
        (
            Ok(()),
            RegisterInput {
                username: Some(username),
                email: Some(email),
                password: Some(password),
            },
        ) => (username, email, password),
        _ => {
            return Err(AppError::Validation(
                "Username, email and password are required".into(),
            ))
        }
    };

    let cost = config.bcrypt_cost;
    let password_hash = web::block(move || hash_password(&password, cost)).await??;

    if User::username_exists(pool, &username).await? {
        return Err(AppError::Conflict("Username already exists".into()));
    }
    if User::email_exists(pool, &email).await? {
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let user = User::insert(pool, &username, &email, &password_hash).await?;

    log::info!("Registered user {} (id {})", user.username, user.id);
    Ok(user)
}

/// Checks a username/password pair and issues a token for the matching user.
///
/// An unknown username and a wrong password produce the same error.
pub async fn authenticate(
    pool: &SqlitePool,
    config: &Config,
    input: LoginInput,
) -> Result<(String, User), AppError> {
    let (username, password) = match (input.validate(), input) {
        (
            Ok(()),
            LoginInput {
                username: Some(username),
                password: Some(password),
            },
        ) => (username, password),
        _ => {
            return Err(AppError::Validation(
                "Username and password are required".into(),
            ))
        }
    };

    let user = User::find_by_username(pool, &username).await?;
    let verified = match &user {
        Some(user) => {
            let hash = user.password_hash.clone();
            web::block(move || verify_password(&password, &hash)).await??
        }
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            log::warn!("Failed login attempt for username {:?}", username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let token = generate_token(user.id, &config.jwt_secret)?;
    log::info!("User {} logged in", user.id);
    Ok((token, user))
}
