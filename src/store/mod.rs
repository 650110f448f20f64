//! Persistence for users and tasks.
//!
//! Handlers only see the [`Store`] trait. [`PgStore`] is the production backend;
//! [`MemoryStore`] keeps everything in process and backs the test suite.
//!
//! Task lookups take an optional `owner`. When it is `Some`, rows owned by anyone else are
//! treated exactly like missing rows.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;

use crate::models::{NewUser, Task, TaskFilter, TaskInput, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed row does not exist (or is soft-deleted, or belongs to someone else).
    NotFound,
    /// A uniqueness constraint rejected the write.
    Conflict(String),
    /// Connection, protocol or any other backend failure.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Conflict(msg) => write!(f, "conflict: {}", msg),
            StoreError::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some(constraint) if constraint.contains("email") => {
                        StoreError::Conflict("Email already exists".into())
                    }
                    Some(constraint) => {
                        StoreError::Conflict(format!("Constraint violation: {}", constraint))
                    }
                    None => StoreError::Conflict(db_err.message().to_string()),
                }
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user. A duplicate email yields `StoreError::Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// All live tasks matching `filter`, oldest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, id: i64, owner: Option<i64>) -> Result<Option<Task>, StoreError>;

    async fn create_task(&self, owner: i64, input: TaskInput) -> Result<Task, StoreError>;

    /// Replaces title, content and status. The id and owner of the row never change.
    async fn update_task(
        &self,
        id: i64,
        owner: Option<i64>,
        input: TaskInput,
    ) -> Result<Task, StoreError>;

    /// Soft-deletes the task.
    async fn delete_task(&self, id: i64, owner: Option<i64>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert_eq!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound);
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
