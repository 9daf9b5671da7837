use crate::error::AppError;
use crate::models::{Task, TaskStatus};
use chrono::Utc;
use sqlx::SqlitePool;

pub const TASK_COMPLETED_MESSAGE: &str = "Task already completed";

const TASK_COLUMNS: &str = "id, title, description, status, user_id, created_at";

/// Expected failures of task operations.
#[derive(Debug)]
pub enum TaskError {
    /// No task with that id belongs to the caller. Covers both "absent" and
    /// "owned by someone else".
    NotFound,
    /// The task was already completed and cannot be edited.
    AlreadyCompleted,
    Database(sqlx::Error),
}

impl From<sqlx::Error> for TaskError {
    fn from(error: sqlx::Error) -> Self {
        TaskError::Database(error)
    }
}

impl From<TaskError> for AppError {
    fn from(error: TaskError) -> AppError {
        match error {
            TaskError::NotFound => AppError::NotFound,
            TaskError::AlreadyCompleted => AppError::BadRequest(TASK_COMPLETED_MESSAGE.to_string()),
            TaskError::Database(e) => AppError::from(e),
        }
    }
}

/// Task persistence. Every query is filtered by the owning user id, which
/// callers must take from the authorization gate, never from the request.
#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a pending task owned by `user_id`.
    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Task, TaskError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(
            "INSERT INTO tasks (title, description, status, user_id, created_at)
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(title)
            .bind(description)
            .bind(TaskStatus::Pending)
            .bind(user_id)
            .bind(Utc::now())
            .fetch_one(&mut *conn)
            .await?;
        Ok(task)
    }

    /// All tasks owned by `user_id`, oldest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Task>, TaskError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = ? ORDER BY id",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(tasks)
    }

    pub async fn get_one(&self, user_id: i64, task_id: i64) -> Result<Task, TaskError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = ? AND user_id = ?",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Replaces title and description and marks the task completed.
    ///
    /// The write only matches a pending task, so a completed one is never
    /// touched; a second lookup tells "completed" apart from "not yours".
    pub async fn update(
        &self,
        user_id: i64,
        task_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Task, TaskError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(
            "UPDATE tasks SET title = ?, description = ?, status = ?
             WHERE id = ? AND user_id = ? AND status = ?
             RETURNING {}",
            TASK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(title)
            .bind(description)
            .bind(TaskStatus::Completed)
            .bind(task_id)
            .bind(user_id)
            .bind(TaskStatus::Pending)
            .fetch_optional(&mut *conn)
            .await?;

        if let Some(task) = updated {
            return Ok(task);
        }

        let current =
            sqlx::query_as::<_, (TaskStatus,)>("SELECT status FROM tasks WHERE id = ? AND user_id = ?")
                .bind(task_id)
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;

        match current {
            Some(_) => Err(TaskError::AlreadyCompleted),
            None => Err(TaskError::NotFound),
        }
    }

    pub async fn delete(&self, user_id: i64, task_id: i64) -> Result<(), TaskError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound);
        }
        Ok(())
    }
}
