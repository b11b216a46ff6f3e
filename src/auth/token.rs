use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's identifier.
    pub sub: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Generates an HS256 JWT for a given user ID, valid for 24 hours.
///
/// # Returns
/// The encoded token, or `AppError::Internal` if the timestamp overflows or
/// encoding fails.
pub fn generate_token(user_id: i64, secret: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal("Token expiration overflow".into()))?;

    let claims = Claims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and returns the user identifier it carries.
///
/// Signature and expiration are checked. Malformed, forged and expired tokens
/// all yield `AppError::Unauthorized`; only the message differs for expiry.
/// A token is expired from the second its `exp` passes, with no leeway.
pub fn verify_token(token: &str, secret: &str) -> Result<i64, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims.sub)
}
