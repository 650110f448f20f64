pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::state::AppState;

/// Registers the application state and every route.
///
/// ```text
/// GET    /health
/// POST   /register
/// POST   /login
/// GET    /tasks/?status=   (token)
/// POST   /tasks/           (token)
/// GET    /tasks/{id}       (token)
/// PUT    /tasks/{id}       (token)
/// DELETE /tasks/{id}       (token)
/// ```
pub fn config(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let auth_middleware = AuthMiddleware::new(state.tokens.clone());

        cfg.app_data(state)
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .service(health::health)
            .service(auth::register)
            .service(auth::login)
            .service(
                web::scope("/tasks")
                    .wrap(auth_middleware)
                    .app_data(web::PathConfig::default().error_handler(task_path_error))
                    .service(tasks::list_tasks)
                    .service(tasks::create_task)
                    .service(tasks::get_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            );
    }
}

fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejecting body of {} {}: {}", req.method(), req.path(), err);
    AppError::BadRequest("Invalid request payload".into()).into()
}

/// A task id that is not a number cannot name an existing task.
fn task_path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejecting path {}: {}", req.path(), err);
    AppError::NotFound("Task not found".into()).into()
}
