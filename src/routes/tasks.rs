use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    CreateTaskRequest, TaskListResponse, TaskQueryParams, TaskResponse, UpdateTaskRequest,
};
use crate::response::ApiResponse;
use crate::services::TaskService;

/// Lists the tasks matching the query string.
///
/// Supports filtering by `status`, `priority`, a case-insensitive `search`
/// over titles and descriptions, and an inclusive `due_date_from` /
/// `due_date_to` window (YYYY-MM-DD). `page` and `limit` paginate the
/// result; `sort_by` and `sort_order` control ordering, defaulting to
/// newest first.
#[get("")]
pub async fn list_tasks(
    service: web::Data<TaskService>,
    params: web::Query<TaskQueryParams>,
) -> Result<impl Responder, AppError> {
    params.validate()?;
    let (tasks, meta) = service.list(&params).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "tasks retrieved successfully",
        TaskListResponse::new(&tasks, meta),
    )))
}

#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    body: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let task = service.create(&body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "task created successfully",
        TaskResponse::from(&task),
    )))
}

#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = service.get(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "task retrieved successfully",
        TaskResponse::from(&task),
    )))
}

/// Partially updates a task: omitted or empty fields keep their stored
/// values.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    path: web::Path<String>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let task = service.update(&path, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "task updated successfully",
        TaskResponse::from(&task),
    )))
}

#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    service.delete(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_only("task deleted successfully")))
}
