use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{NewUser, Task, TaskFilter, TaskInput, User};

/// In-process store with the same observable behavior as `PgStore`: sequential ids,
/// unique emails, soft deletes and owner scoping.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

impl Inner {
    fn live_task_mut(&mut self, id: i64, owner: Option<i64>) -> Option<&mut Task> {
        self.tasks
            .get_mut(&id)
            .filter(|t| t.deleted_at.is_none() && owner.map_or(true, |o| t.user_id == o))
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already exists".into()));
        }

        inner.last_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: inner.last_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .values()
            .filter(|t| t.deleted_at.is_none() && filter.matches(t))
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: i64, owner: Option<i64>) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .get(&id)
            .filter(|t| t.deleted_at.is_none() && owner.map_or(true, |o| t.user_id == o))
            .cloned())
    }

    async fn create_task(&self, owner: i64, input: TaskInput) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: inner.last_task_id,
            title: input.title,
            content: input.content,
            status: input.status,
            user_id: owner,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        id: i64,
        owner: Option<i64>,
        input: TaskInput,
    ) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner.live_task_mut(id, owner).ok_or(StoreError::NotFound)?;
        task.title = input.title;
        task.content = input.content;
        task.status = input.status;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64, owner: Option<i64>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner.live_task_mut(id, owner).ok_or(StoreError::NotFound)?;
        task.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn input(title: &str, status: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            content: String::new(),
            status: status.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let first = store.create_user(new_user("a@x.com")).await.unwrap();
        assert_eq!(first.id, 1);

        let err = store.create_user(new_user("a@x.com")).await.unwrap_err();
        assert_eq!(err, StoreError::Conflict("Email already exists".into()));
    }

    #[actix_rt::test]
    async fn test_soft_deleted_tasks_disappear() {
        let store = MemoryStore::new();
        let task = store.create_task(1, input("t", "todo")).await.unwrap();

        store.delete_task(task.id, None).await.unwrap();

        assert!(store.find_task(task.id, None).await.unwrap().is_none());
        assert!(store.list_tasks(&TaskFilter::default()).await.unwrap().is_empty());
        assert_eq!(
            store.delete_task(task.id, None).await.unwrap_err(),
            StoreError::NotFound
        );
        assert_eq!(
            store
                .update_task(task.id, None, input("again", "todo"))
                .await
                .unwrap_err(),
            StoreError::NotFound
        );
    }

    #[actix_rt::test]
    async fn test_owner_scoping() {
        let store = MemoryStore::new();
        let task = store.create_task(1, input("mine", "todo")).await.unwrap();

        assert!(store.find_task(task.id, Some(2)).await.unwrap().is_none());
        assert!(store.find_task(task.id, Some(1)).await.unwrap().is_some());
        assert!(store.find_task(task.id, None).await.unwrap().is_some());
        assert_eq!(
            store.delete_task(task.id, Some(2)).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[actix_rt::test]
    async fn test_update_keeps_id_and_owner() {
        let store = MemoryStore::new();
        let task = store.create_task(3, input("before", "todo")).await.unwrap();

        let updated = store
            .update_task(task.id, None, input("after", "done"))
            .await
            .unwrap();

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.user_id, 3);
        assert_eq!(updated.title, "after");
        assert_eq!(updated.content, "");
        assert_eq!(updated.created_at, task.created_at);
    }
}
