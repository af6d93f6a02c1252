use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::Cancelled;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo {0} not found")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Operation cancelled")]
    Cancelled,
}

pub type TodoResult<T> = Result<T, TodoError>;

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(id) => AppError::NotFound(format!("Todo {} not found", id)),
            TodoError::Validation(msg) => AppError::BadRequest(msg),
            TodoError::Database(err) => AppError::Database(err),
            TodoError::Cancelled => AppError::ServiceUnavailable("Request cancelled".to_string()),
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<Cancelled> for TodoError {
    fn from(_: Cancelled) -> Self {
        TodoError::Cancelled
    }
}
