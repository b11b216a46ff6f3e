use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

/// Priority given to tasks created without one.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Free-form label such as "low", "medium" or "high".
    pub priority: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update.
    pub updated_at: DateTime<Utc>,
    /// Identifier of the user who owns the task.
    pub user_id: i64,
}

/// Payload of `POST /api/tasks`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskInput {
    /// Required, between 1 and 200 characters.
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters")
    )]
    pub title: Option<String>,

    /// Defaults to an empty string.
    pub description: Option<String>,

    /// Defaults to `"medium"`.
    #[validate(length(min = 1, max = 20, message = "Priority must be between 1 and 20 characters"))]
    pub priority: Option<String>,
}

/// Payload of `PUT /api/tasks/{id}`. Only the fields present are changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    #[validate(length(min = 1, max = 20, message = "Priority must be between 1 and 20 characters"))]
    pub priority: Option<String>,
}

/// A validated task ready to be inserted.
#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: String,
}

const TASK_COLUMNS: &str =
    "id, title, description, completed, priority, created_at, updated_at, user_id";

// Task store. Every query filters on `user_id`, so a task owned by someone else
// behaves exactly like a missing one.
impl Task {
    pub async fn list_for_owner(pool: &SqlitePool, user_id: i64) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_for_owner(
        pool: &SqlitePool,
        user_id: i64,
        task_id: i64,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert(pool: &SqlitePool, user_id: i64, new_task: NewTask) -> Result<Task, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, completed, priority, created_at, updated_at, user_id)
             VALUES (?, ?, FALSE, ?, ?, ?, ?)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(new_task.title)
        .bind(new_task.description)
        .bind(new_task.priority)
        .bind(now)
        .bind(now)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Applies the supplied fields in a single statement and returns the new row,
    /// or `None` when the task does not exist for this owner.
    pub async fn update_for_owner(
        pool: &SqlitePool,
        user_id: i64,
        task_id: i64,
        changes: TaskUpdate,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = COALESCE(?, title),
                 description = COALESCE(?, description),
                 completed = COALESCE(?, completed),
                 priority = COALESCE(?, priority),
                 updated_at = ?
             WHERE id = ? AND user_id = ?
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.completed)
        .bind(changes.priority)
        .bind(Utc::now())
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Returns `false` when nothing matched.
    pub async fn delete_for_owner(pool: &SqlitePool, user_id: i64, task_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
