use async_stream::stream;
use async_trait::async_trait;
use database::cancellable;
use futures::Stream;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{TodoError, TodoResult};
use crate::filter::{TodoFilter, matches_all};
use crate::models::Todo;
use crate::repository::{TodoRepository, TodoStream};

/// Process-local store keyed by id.
///
/// Ids are UUIDv7, so iteration order is creation order. Clones share the
/// same map.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<RwLock<BTreeMap<Uuid, Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

fn snapshot_stream(
    todos: Arc<RwLock<BTreeMap<Uuid, Todo>>>,
    filters: Vec<TodoFilter>,
    cancel: CancellationToken,
) -> impl Stream<Item = TodoResult<Todo>> + Send + 'static {
    stream! {
        let matching: Vec<Todo> = match cancellable(&cancel, todos.read()).await {
            Ok(guard) => guard
                .values()
                .filter(|todo| matches_all(&filters, todo))
                .cloned()
                .collect(),
            Err(cancelled) => {
                yield Err(TodoError::from(cancelled));
                return;
            }
        };

        for todo in matching {
            if cancel.is_cancelled() {
                yield Err(TodoError::Cancelled);
                return;
            }
            yield Ok(todo);
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, mut todo: Todo, cancel: &CancellationToken) -> TodoResult<Todo> {
        todo.id = Uuid::now_v7();
        let mut todos = cancellable(cancel, self.todos.write()).await?;
        todos.insert(todo.id, todo.clone());

        tracing::info!(todo_id = %todo.id, "Created todo");
        Ok(todo)
    }

    fn list(&self, filters: Vec<TodoFilter>, cancel: CancellationToken) -> TodoStream {
        Box::pin(snapshot_stream(self.todos.clone(), filters, cancel))
    }

    async fn get(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<Option<Todo>> {
        let todos = cancellable(cancel, self.todos.read()).await?;
        Ok(todos.get(&id).cloned())
    }

    async fn update(&self, todo: Todo, cancel: &CancellationToken) -> TodoResult<Todo> {
        let mut todos = cancellable(cancel, self.todos.write()).await?;
        let slot = todos.get_mut(&todo.id).ok_or(TodoError::NotFound(todo.id))?;
        *slot = todo.clone();

        tracing::info!(todo_id = %todo.id, "Updated todo");
        Ok(todo)
    }

    async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<()> {
        let mut todos = cancellable(cancel, self.todos.write()).await?;
        todos.remove(&id).ok_or(TodoError::NotFound(id))?;

        tracing::info!(todo_id = %id, "Deleted todo");
        Ok(())
    }
}
