use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{MessageResponse, TaskRequest, TaskResponse},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

// Every handler here sits behind `AuthMiddleware`; the owner id always comes
// from `AuthenticatedUserId`, never from the path or body.

/// Creates a new pending task owned by the caller.
///
/// ## Responses:
/// - `200 OK`: `{id, title, description, status: "pending"}`.
/// - `401 Unauthorized`: Token or API key rejected.
/// - `422 Unprocessable Entity`: The body is not `{title, description}`.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_data: web::Json<TaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .create(user.0, &task_data.title, &task_data.description)
        .await?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// Lists the caller's tasks in creation order.
///
/// ## Responses:
/// - `200 OK`: An array of tasks, empty when the caller has none.
/// - `401 Unauthorized`: Token or API key rejected.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks: Vec<TaskResponse> = state
        .tasks
        .list_by_user(user.0)
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: The task.
/// - `404 Not Found`: No such task, or it belongs to another user. The two
///   cases are indistinguishable.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get_one(user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// Replaces a pending task's title and description and marks it completed.
///
/// ## Responses:
/// - `200 OK`: The updated task with `status: "completed"`.
/// - `400 Bad Request`: `"Task already completed"`.
/// - `404 Not Found`: As for `get_task`.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(
            user.0,
            task_id.into_inner(),
            &task_data.title,
            &task_data.description,
        )
        .await?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// Deletes one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `404 Not Found`: As for `get_task`.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    state.tasks.delete(user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Task deleted successfully")))
}
