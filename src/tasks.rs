//! Task operations on behalf of an authenticated user.
//!
//! Every function takes the owner's id and only ever touches that owner's rows.
//! A task that belongs to somebody else is reported exactly like one that does
//! not exist, so one account learns nothing about another account's ids.

use sqlx::SqlitePool;
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskInput, TaskUpdate, DEFAULT_PRIORITY};

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Parses a task id from the URL. Anything that is not an integer is "not found".
pub fn parse_task_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| task_not_found())
}

pub async fn list_tasks(pool: &SqlitePool, user_id: i64) -> Result<Vec<Task>, AppError> {
    Ok(Task::list_for_owner(pool, user_id).await?)
}

pub async fn create_task(pool: &SqlitePool, user_id: i64, input: TaskInput) -> Result<Task, AppError> {
    input.validate()?;

    let title = input
        .title
        .ok_or_else(|| AppError::Validation("Title is required".into()))?;
    let new_task = NewTask {
        title,
        description: input.description.unwrap_or_default(),
        priority: input
            .priority
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
    };

    let task = Task::insert(pool, user_id, new_task).await?;
    log::info!("User {} created task {}", user_id, task.id);
    Ok(task)
}

/// Looks up one of the owner's tasks.
pub async fn get_task(pool: &SqlitePool, user_id: i64, task_id: i64) -> Result<Task, AppError> {
    Task::find_for_owner(pool, user_id, task_id)
        .await?
        .ok_or_else(task_not_found)
}

/// Applies a partial update. `updated_at` is refreshed even when no field changes.
///
/// Ownership is settled before the payload is validated, so a bad payload
/// aimed at someone else's task is still "not found".
pub async fn update_task(
    pool: &SqlitePool,
    user_id: i64,
    task_id: i64,
    changes: TaskUpdate,
) -> Result<Task, AppError> {
    get_task(pool, user_id, task_id).await?;
    changes.validate()?;

    Task::update_for_owner(pool, user_id, task_id, changes)
        .await?
        .ok_or_else(task_not_found)
}

pub async fn delete_task(pool: &SqlitePool, user_id: i64, task_id: i64) -> Result<(), AppError> {
    if !Task::delete_for_owner(pool, user_id, task_id).await? {
        return Err(task_not_found());
    }
    log::info!("User {} deleted task {}", user_id, task_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::db;
    use crate::models::User;
    use std::time::Duration;

    async fn create_user(pool: &SqlitePool, username: &str) -> User {
        let hash = hash_password("testpass123", 4).unwrap();
        User::insert(pool, username, &format!("{}@test.com", username), &hash)
            .await
            .unwrap()
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_task_id() {
        assert_eq!(parse_task_id("42").unwrap(), 42);
        assert!(matches!(parse_task_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_task_id("1.5"), Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_create_task_defaults() {
        let pool = db::connect_in_memory().await.unwrap();
        let user = create_user(&pool, "alice").await;

        let task = create_task(&pool, user.id, input("Write docs")).await.unwrap();

        assert_eq!(task.title, "Write docs");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, "medium");
        assert!(!task.completed);
        assert_eq!(task.user_id, user.id);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[actix_rt::test]
    async fn test_create_task_requires_title() {
        let pool = db::connect_in_memory().await.unwrap();
        let user = create_user(&pool, "alice").await;

        let err = create_task(&pool, user.id, TaskInput::default()).await.unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Title is required"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_tasks_are_isolated_between_users() {
        let pool = db::connect_in_memory().await.unwrap();
        let alice = create_user(&pool, "alice").await;
        let bob = create_user(&pool, "bob").await;

        let task = create_task(&pool, alice.id, input("Alice only")).await.unwrap();

        assert_eq!(list_tasks(&pool, alice.id).await.unwrap().len(), 1);
        assert!(list_tasks(&pool, bob.id).await.unwrap().is_empty());

        let update = update_task(&pool, bob.id, task.id, TaskUpdate::default()).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));

        let delete = delete_task(&pool, bob.id, task.id).await;
        assert!(matches!(delete, Err(AppError::NotFound(_))));

        // Bob's attempts left the task untouched.
        let remaining = list_tasks(&pool, alice.id).await.unwrap();
        assert_eq!(remaining[0].updated_at, task.updated_at);
    }

    #[actix_rt::test]
    async fn test_partial_update_keeps_other_fields() {
        let pool = db::connect_in_memory().await.unwrap();
        let user = create_user(&pool, "alice").await;

        let task = create_task(
            &pool,
            user.id,
            TaskInput {
                title: Some("Buy milk".to_string()),
                description: Some("Semi-skimmed".to_string()),
                priority: Some("high".to_string()),
            },
        )
        .await
        .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        let updated = update_task(
            &pool,
            user.id,
            task.id,
            TaskUpdate {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.description, "Semi-skimmed");
        assert_eq!(updated.priority, "high");
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at > task.updated_at);
    }

    #[actix_rt::test]
    async fn test_update_checks_owner_before_payload() {
        let pool = db::connect_in_memory().await.unwrap();
        let alice = create_user(&pool, "alice").await;
        let bob = create_user(&pool, "bob").await;
        let task = create_task(&pool, alice.id, input("Alice only")).await.unwrap();

        let empty_title = || TaskUpdate {
            title: Some(String::new()),
            ..Default::default()
        };

        let foreign = update_task(&pool, bob.id, task.id, empty_title()).await;
        assert!(matches!(foreign, Err(AppError::NotFound(_))));

        let missing = update_task(&pool, alice.id, 999, empty_title()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let own = update_task(&pool, alice.id, task.id, empty_title()).await;
        assert!(matches!(own, Err(AppError::Validation(_))));

        assert_eq!(get_task(&pool, alice.id, task.id).await.unwrap().title, "Alice only");
        assert!(matches!(
            get_task(&pool, bob.id, task.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_delete_task() {
        let pool = db::connect_in_memory().await.unwrap();
        let user = create_user(&pool, "alice").await;
        let task = create_task(&pool, user.id, input("Temporary")).await.unwrap();

        delete_task(&pool, user.id, task.id).await.unwrap();
        assert!(list_tasks(&pool, user.id).await.unwrap().is_empty());

        let again = delete_task(&pool, user.id, task.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_deleting_user_cascades_to_tasks() {
        let pool = db::connect_in_memory().await.unwrap();
        let user = create_user(&pool, "alice").await;
        create_task(&pool, user.id, input("One")).await.unwrap();
        create_task(&pool, user.id, input("Two")).await.unwrap();

        assert!(User::delete(&pool, user.id).await.unwrap());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
