use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskFilter, TaskInput, TaskQuery},
    response::Envelope,
    state::AppState,
    store::StoreError,
};
use actix_web::{delete, get, http::StatusCode, post, put, web, HttpResponse};

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Lists tasks, optionally filtered by exact `status`.
///
/// ## Query Parameters:
/// - `status` (optional): only tasks whose status equals this value. Empty means no filter.
///
/// No pagination: the whole matching set is returned, oldest first. With ownership
/// enforcement on (the default) only the caller's tasks are listed.
///
/// ## Responses:
/// - `200 OK`: envelope with a (possibly empty) array of tasks.
/// - `401 Unauthorized`: missing or invalid token.
#[get("/")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<TaskQuery>,
) -> Result<HttpResponse, AppError> {
    // `?status=` with no value lists everything
    let filter = TaskFilter {
        status: query.into_inner().status.filter(|s| !s.is_empty()),
        owner: state.owner_scope(user.id),
    };
    let tasks = state.store.list_tasks(&filter).await?;

    Ok(Envelope::respond(
        StatusCode::OK,
        "Tasks retrieved successfully",
        tasks,
    ))
}

/// Creates a task owned by the caller.
///
/// The body supplies `title`, `content` and `status`. Any `id` or `user_id` in the body is
/// ignored; the owner is always the authenticated user.
///
/// ## Responses:
/// - `201 Created`: envelope with the stored task.
/// - `400 Bad Request`: body is not a JSON object of the expected shape.
/// - `401 Unauthorized`: missing or invalid token.
#[post("/")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let task = state
        .store
        .create_task(user.id, task_data.into_inner())
        .await?;

    log::debug!("user {} created task {}", user.id, task.id);
    Ok(Envelope::respond(
        StatusCode::CREATED,
        "Task created successfully",
        task,
    ))
}

/// Retrieves a task by id.
///
/// ## Responses:
/// - `200 OK`: envelope with the task.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no such task (deleted, never existed, or owned by someone else
///   while ownership is enforced).
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let task = state
        .store
        .find_task(task_id.into_inner(), state.owner_scope(user.id))
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Envelope::respond(
        StatusCode::OK,
        "Task retrieved successfully",
        task,
    ))
}

/// Replaces a task's title, content and status.
///
/// This is a full overwrite: fields missing from the body become empty strings. The task's
/// id and owner never change. The task is looked up before the body is inspected, so an
/// unknown id answers 404 even when the body is also malformed.
///
/// ## Responses:
/// - `200 OK`: envelope with the saved task.
/// - `400 Bad Request`: body is not a JSON object of the expected shape.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no such task.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
    task_data: Result<web::Json<TaskInput>, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let owner = state.owner_scope(user.id);
    let existing = state
        .store
        .find_task(task_id.into_inner(), owner)
        .await?
        .ok_or_else(task_not_found)?;

    let input = task_data
        .map_err(|_| AppError::BadRequest("Invalid request payload".into()))?
        .into_inner();

    let task = state
        .store
        .update_task(existing.id, owner, input)
        .await
        .map_err(|e| match e {
            // deleted between the lookup and the write
            StoreError::NotFound => task_not_found(),
            other => other.into(),
        })?;

    Ok(Envelope::respond(
        StatusCode::OK,
        "Task updated successfully",
        task,
    ))
}

/// Soft-deletes a task.
///
/// ## Responses:
/// - `200 OK`: envelope with `data: null`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no such task.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = task_id.into_inner();
    state
        .store
        .delete_task(id, state.owner_scope(user.id))
        .await
        .map_err(|e| match e {
            StoreError::NotFound => task_not_found(),
            other => other.into(),
        })?;

    log::debug!("user {} deleted task {}", user.id, id);
    Ok(Envelope::<()>::empty(
        StatusCode::OK,
        "Task deleted successfully",
    ))
}
