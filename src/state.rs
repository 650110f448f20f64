use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::Config;
use crate::store::Store;

/// Everything handlers share, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub enforce_task_ownership: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, hasher: PasswordHasher) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            hasher,
            enforce_task_ownership: true,
        }
    }

    pub fn from_config(store: Arc<dyn Store>, config: &Config) -> Self {
        Self::new(
            store,
            TokenService::new(config.jwt_secret.as_bytes()),
            PasswordHasher::new(config.bcrypt_cost),
        )
        .with_task_ownership(config.enforce_task_ownership)
    }

    pub fn with_task_ownership(mut self, enforce: bool) -> Self {
        self.enforce_task_ownership = enforce;
        self
    }

    /// The owner filter task queries should apply for `user_id`.
    pub fn owner_scope(&self, user_id: i64) -> Option<i64> {
        self.enforce_task_ownership.then_some(user_id)
    }
}
