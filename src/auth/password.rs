use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt hashing with a work factor fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `password` with a fresh random salt embedded in the output.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost).map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            AppError::InternalServerError("Error hashing password".into())
        })
    }

    /// True only when `password` matches `hashed_password`. A malformed hash is a mismatch.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        verify(password, hashed_password).unwrap_or(false)
    }
}
