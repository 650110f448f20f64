pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use token::{Claims, TokenError, TokenService};

/// Represents the payload for a new user registration request.
///
/// Absent fields read as empty strings.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    /// Display name; not required to be unique.
    pub name: String,
    /// Email address; must not belong to an existing account.
    pub email: String,
    /// Plaintext password. Only its hash is stored.
    #[validate(must_match(other = "confirm_password", message = "Passwords do not match"))]
    pub password: String,
    /// Must repeat `password` exactly.
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
}

/// Represents the payload for a user login request. Absent fields read as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `data` of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
