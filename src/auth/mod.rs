pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::Serialize;

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::{authenticate, register};
pub use token::{generate_token, verify_token, Claims};

/// Response body of a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// Response body of a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    /// The JWT to send back as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: User,
}
