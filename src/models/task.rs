use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Free-form status such as "todo" or "done"; not constrained to a fixed set.
    pub status: String,
    /// Identifier of the user who created the task. Set once, at creation.
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete tombstone. Tasks with a value here are invisible to every query.
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Request body for creating or replacing a task.
///
/// Every field defaults to an empty string, so an update that omits a field clears it.
/// Anything else in the body (an `id` or `user_id`, for instance) is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskInput {
    pub title: String,
    pub content: String,
    pub status: String,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Exact-match filter on `status`.
    pub status: Option<String>,
}

/// The predicate a store applies when listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<String>,
    /// Restrict to tasks owned by this user. `None` lists everyone's tasks.
    pub owner: Option<i64>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.as_deref().map_or(true, |s| task.status == s)
            && self.owner.map_or(true, |owner| task.user_id == owner)
    }
}
