//! HTTP API for tasks.
//!
//! Every response is a JSON envelope: `{"data": ...}` on success and
//! `{"error": "..."}` with status 400 on any failure.

mod error;
mod tasks;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::Database;

pub use error::{ApiError, ApiResult};

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// The `{"data": "Ok"}` reply of mutations that return nothing.
pub fn ok() -> Json<Data<&'static str>> {
    Data::new("Ok")
}

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/task", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/task/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}
