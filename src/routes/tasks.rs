use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{NewTask, TaskQuery, TaskUpdate},
    store::TaskRepository,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Lists the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in_progress` or `completed`.
/// - `priority` (optional): `low`, `medium` or `high`.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    CurrentUser(user): CurrentUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = TaskRepository::for_owner(&pool, &user)
        .list(&query)
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `description`: required.
/// - `priority` (optional): defaults to `medium`.
/// - `due_date` (optional): RFC 3339 timestamp.
///
/// New tasks always start as `pending`.
#[post("")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    CurrentUser(user): CurrentUser,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = TaskRepository::for_owner(&pool, &user)
        .create(task_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Status and priority counts plus tasks due in the next three days.
///
/// Registered ahead of `/{id}` so that `overview` is never read as an id.
#[get("/overview")]
pub async fn task_overview(
    pool: web::Data<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    let overview = TaskRepository::for_owner(&pool, &user).overview().await?;
    Ok(HttpResponse::Ok().json(overview))
}

/// Retrieves one task. Tasks owned by other users answer `404`, exactly like missing ones.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = TaskRepository::for_owner(&pool, &user)
        .get(task_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task.
///
/// ## Request Body:
/// Any subset of `description`, `priority`, `status` and `due_date`. Absent fields are
/// left unchanged; `"due_date": null` clears the due date. An empty object is `400`.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task = TaskRepository::for_owner(&pool, &user)
        .update(task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task permanently. Responds `204 No Content`.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    TaskRepository::for_owner(&pool, &user)
        .delete(task_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
