#![doc = "The `todo_app` library crate."]
#![doc = ""]
#![doc = "User registration and login with bcrypt-hashed passwords and HS256 tokens, plus"]
#![doc = "token-gated CRUD over tasks. The binary (`main.rs`) loads configuration, connects"]
#![doc = "the Postgres store and mounts `routes::config` on an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
