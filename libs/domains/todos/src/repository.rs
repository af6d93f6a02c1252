use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::TodoResult;
use crate::filter::TodoFilter;
use crate::models::Todo;

/// Lazily produced result of [`TodoRepository::list`]. Single use.
pub type TodoStream = BoxStream<'static, TodoResult<Todo>>;

/// Storage for todos.
///
/// Every operation observes `cancel`: a token that fires before the storage call
/// completes yields [`crate::TodoError::Cancelled`] and leaves storage untouched.
/// Storage failures are returned as-is and never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Persist `todo` under a freshly generated id, ignoring the id it carries
    async fn create(&self, todo: Todo, cancel: &CancellationToken) -> TodoResult<Todo>;

    /// Todos matching every filter, in storage order.
    ///
    /// Nothing is read until the stream is first polled.
    fn list(&self, filters: Vec<TodoFilter>, cancel: CancellationToken) -> TodoStream;

    async fn get(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<Option<Todo>>;

    /// Overwrite title, description, completion and priority of `todo.id`.
    ///
    /// Fails with `NotFound` when no row has that id.
    async fn update(&self, todo: Todo, cancel: &CancellationToken) -> TodoResult<Todo>;

    /// Fails with `NotFound` when no row has that id
    async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<()>;
}
