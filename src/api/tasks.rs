use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use taskboard_core::StoreError;

use super::{ok, ApiError, ApiResult, Data};
use crate::db::Database;
use crate::models::{CreateTaskInput, CreatedTask, Task, UpdateTaskInput};

/// POST /task
pub async fn create_task(
    State(db): State<Database>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> ApiResult<Json<Data<CreatedTask>>> {
    let Json(input) = payload?;
    let id = db.create_task(input)?;

    tracing::info!(task_id = id, "task created");
    Ok(Data::new(CreatedTask { id }))
}

/// GET /task
pub async fn list_tasks(State(db): State<Database>) -> ApiResult<Json<Data<Vec<Task>>>> {
    Ok(Data::new(db.get_all_tasks()?))
}

/// GET /task/{id}
pub async fn get_task(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Data<Task>>> {
    let Path(id) = id?;
    let task = db.get_task(id)?.ok_or(StoreError::NotFound)?;
    Ok(Data::new(task))
}

/// PATCH /task/{id}
pub async fn update_task(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> ApiResult<Json<Data<&'static str>>> {
    let Path(id) = id?;
    let Json(input) = payload?;

    if !db.update_task(id, input)? {
        return Err(ApiError::bad_request("Can't find task for update"));
    }

    tracing::info!(task_id = id, "task updated");
    Ok(ok())
}

/// DELETE /task/{id}
pub async fn delete_task(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Data<&'static str>>> {
    let Path(id) = id?;

    match db.delete_task(id) {
        Ok(true) => {
            tracing::info!(task_id = id, "task deleted");
            Ok(ok())
        }
        Ok(false) => Err(delete_failed(StoreError::NotFound)),
        Err(err) => Err(delete_failed(err)),
    }
}

fn delete_failed(err: StoreError) -> ApiError {
    ApiError::bad_request(format!("Can't delete element: {err}"))
}
