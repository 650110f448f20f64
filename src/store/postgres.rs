use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Store, StoreError};
use crate::models::{NewUser, Task, TaskFilter, TaskInput, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, content, status, user_id, created_at, updated_at, deleted_at";

/// PostgreSQL-backed store.
///
/// Schema lives in `migrations/`. `users.email` carries a UNIQUE constraint, which is what
/// turns concurrent duplicate registrations into `StoreError::Conflict`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        log::info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.name)
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE deleted_at IS NULL \
               AND ($1::TEXT IS NULL OR status = $1) \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
             ORDER BY id",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(filter.status.as_deref())
            .bind(filter.owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_task(&self, id: i64, owner: Option<i64>) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE id = $1 AND deleted_at IS NULL AND ($2::BIGINT IS NULL OR user_id = $2)",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn create_task(&self, owner: i64, input: TaskInput) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks (title, content, status, user_id) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.content)
            .bind(input.status)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        id: i64,
        owner: Option<i64>,
        input: TaskInput,
    ) -> Result<Task, StoreError> {
        let sql = format!(
            "UPDATE tasks SET title = $1, content = $2, status = $3, updated_at = NOW() \
             WHERE id = $4 AND deleted_at IS NULL AND ($5::BIGINT IS NULL OR user_id = $5) \
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.content)
            .bind(input.status)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_task(&self, id: i64, owner: Option<i64>) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL AND ($2::BIGINT IS NULL OR user_id = $2)",
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
