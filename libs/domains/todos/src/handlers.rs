//! HTTP handlers for `/todos`.
//!
//! Each request runs under a child of the abort token handed to [`router`].
//! The server cancels it only once the shutdown drain period is over, so a
//! request already in flight when shutdown begins still completes; storage
//! calls cut off after that end with 503.

use axum::{
    Json, Router,
    extract::{OriginalUri, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::TodoResult;
use crate::models::{Todo, TodoPayload, TodoQuery};
use crate::repository::TodoRepository;
use crate::service::TodoService;

#[derive(OpenApi)]
#[openapi(
    paths(list_todos, get_todo, create_todo, update_todo, delete_todo),
    components(schemas(Todo, TodoPayload)),
    tags((name = "todos", description = "Todo list management"))
)]
pub struct TodosApiDoc;

pub struct TodoState<R: TodoRepository + 'static> {
    pub service: Arc<TodoService<R>>,
    pub abort: CancellationToken,
}

impl<R: TodoRepository + 'static> Clone for TodoState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            abort: self.abort.clone(),
        }
    }
}

impl<R: TodoRepository + 'static> TodoState<R> {
    fn request_token(&self) -> CancellationToken {
        self.abort.child_token()
    }
}

/// Routes relative to the mount point; the app nests them at `/todos`.
pub fn router<R: TodoRepository + 'static>(
    service: TodoService<R>,
    abort: CancellationToken,
) -> Router {
    let state = TodoState {
        service: Arc::new(service),
        abort,
    };

    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(state)
}

/// List todos, optionally filtered
#[utoipa::path(
    get,
    path = "",
    tag = "todos",
    params(TodoQuery),
    responses(
        (status = 200, description = "Todos matching every filter", body = Vec<Todo>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_todos<R: TodoRepository + 'static>(
    State(state): State<TodoState<R>>,
    query: Result<Query<TodoQuery>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let todos: Vec<Todo> = state
        .service
        .list_todos(query, state.request_token())
        .try_collect()
        .await?;

    Ok(Json(todos))
}

/// Get a todo by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_todo<R: TodoRepository + 'static>(
    State(state): State<TodoState<R>>,
    UuidPath(id): UuidPath,
) -> TodoResult<Json<Todo>> {
    let todo = state.service.get_todo(id, &state.request_token()).await?;
    Ok(Json(todo))
}

/// Create a todo. The body must not carry an id.
#[utoipa::path(
    post,
    path = "",
    tag = "todos",
    request_body = TodoPayload,
    responses(
        (status = 201, description = "Todo created", body = Todo,
            headers(("Location" = String, description = "URI of the new todo"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_todo<R: TodoRepository + 'static>(
    State(state): State<TodoState<R>>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(payload): ValidatedJson<TodoPayload>,
) -> TodoResult<impl IntoResponse> {
    let todo = state
        .service
        .create_todo(payload, &state.request_token())
        .await?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), todo.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(todo)))
}

/// Replace a todo. A body id, if present, must match the path.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    request_body = TodoPayload,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_todo<R: TodoRepository + 'static>(
    State(state): State<TodoState<R>>,
    UuidPath(id): UuidPath,
    ValidatedJson(payload): ValidatedJson<TodoPayload>,
) -> TodoResult<Json<Todo>> {
    let todo = state
        .service
        .update_todo(id, payload, &state.request_token())
        .await?;
    Ok(Json(todo))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_todo<R: TodoRepository + 'static>(
    State(state): State<TodoState<R>>,
    UuidPath(id): UuidPath,
) -> TodoResult<StatusCode> {
    state
        .service
        .delete_todo(id, &state.request_token())
        .await?;
    Ok(StatusCode::OK)
}
