//! Todo routes backed by Postgres.

use axum::Router;
use domain_todos::{PgTodoRepository, TodoService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgTodoRepository::new(state.db.clone());
    handlers::router(TodoService::new(repository), state.abort.clone())
}
