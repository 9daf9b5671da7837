use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the status of a task.
/// Stored as lowercase text in the `tasks.status` column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Every task starts here.
    Pending,
    /// Terminal: a completed task cannot be edited again.
    Completed,
}

/// Body of `POST /tasks` and `PUT /tasks/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskRequest {
    pub title: String,
    pub description: String,
}

/// Represents a task entity as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i64,
    /// The title of the task.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// The current status of the task.
    pub status: TaskStatus,
    /// Identifier of the user who owns the task. Never changes.
    pub user_id: i64,
    /// Timestamp of when the task was created, stamped by the server.
    pub created_at: DateTime<Utc>,
}

/// The public view of a task returned by the API.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
        }
    }
}
