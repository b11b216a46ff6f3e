use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskUpdate},
    tasks,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;

/// Lists the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: `{tasks: [...]}`, ordered by id.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = tasks::list_tasks(&pool, user.id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: required.
/// - `description` (optional): defaults to `""`.
/// - `priority` (optional): defaults to `"medium"`.
///
/// ## Responses:
/// - `201 Created`: `{message, task}`.
/// - `400 Bad Request`: title missing or empty.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[post("")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks::create_task(&pool, user.id(), task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "task": task
    })))
}

/// Updates any subset of `title`, `description`, `completed` and `priority`.
///
/// The task is looked up before the body is looked at: a request for a task the
/// caller does not own is a 404 whatever its payload.
///
/// ## Responses:
/// - `200 OK`: `{message, task}`.
/// - `400 Bad Request`: malformed body or invalid field values.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no such task for this user (including non-numeric ids).
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    task_data: Result<web::Json<TaskUpdate>, actix_web::Error>,
) -> Result<impl Responder, actix_web::Error> {
    let task_id = tasks::parse_task_id(&task_id)?;
    let changes = match task_data {
        Ok(changes) => changes.into_inner(),
        Err(body_error) => {
            tasks::get_task(&pool, user.id(), task_id).await?;
            return Err(body_error);
        }
    };
    let task = tasks::update_task(&pool, user.id(), task_id, changes).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": task
    })))
}

/// Deletes a task permanently.
///
/// ## Responses:
/// - `200 OK`: `{message}`.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no such task for this user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task_id = tasks::parse_task_id(&task_id)?;
    tasks::delete_task(&pool, user.id(), task_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
