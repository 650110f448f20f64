pub mod task;
pub mod user;

pub use task::{Task, TaskFilter, TaskInput, TaskQuery};
pub use user::{NewUser, User};
