//! Todos Domain
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP mapping, request cancellation
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │   Service   │  ← id rules, validation
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + Postgres / in-memory implementations
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │   Filters   │  ← predicates, lowered to SQL for Postgres
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todos::{PgTodoRepository, TodoService, handlers};
//! use sea_orm::Database;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//! let service = TodoService::new(PgTodoRepository::new(db));
//! let routes = axum::Router::new().nest("/todos", handlers::router(service, CancellationToken::new()));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TodoError, TodoResult};
pub use filter::TodoFilter;
pub use handlers::TodosApiDoc;
pub use memory::InMemoryTodoRepository;
pub use models::{Priority, Todo, TodoPayload, TodoQuery};
pub use postgres::PgTodoRepository;
pub use repository::{TodoRepository, TodoStream};
pub use service::TodoService;
