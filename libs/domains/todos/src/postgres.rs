use async_stream::stream;
use async_trait::async_trait;
use database::cancellable;
use futures::{Stream, StreamExt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    entity,
    error::{TodoError, TodoResult},
    filter::{TodoFilter, condition_all},
    models::Todo,
    repository::{TodoRepository, TodoStream},
};

/// Todo storage on PostgreSQL.
///
/// Each call borrows a connection from the pool for one statement; the pool
/// takes it back on every exit path, including cancellation.
#[derive(Clone)]
pub struct PgTodoRepository {
    db: DatabaseConnection,
}

impl PgTodoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn row_stream(
    db: DatabaseConnection,
    filters: Vec<TodoFilter>,
    cancel: CancellationToken,
) -> impl Stream<Item = TodoResult<Todo>> + Send + 'static {
    stream! {
        let query = entity::Entity::find()
            .filter(condition_all(&filters))
            .order_by_asc(entity::Column::Id);
        let mut rows = match cancellable(&cancel, query.stream(&db)).await {
            Ok(Ok(rows)) => Box::pin(rows),
            Ok(Err(e)) => {
                yield Err(TodoError::from(e));
                return;
            }
            Err(cancelled) => {
                yield Err(TodoError::from(cancelled));
                return;
            }
        };

        loop {
            match cancellable(&cancel, rows.next()).await {
                Ok(Some(Ok(model))) => {
                    yield Ok(Todo::from(model));
                }
                Ok(Some(Err(e))) => {
                    yield Err(TodoError::from(e));
                    return;
                }
                Ok(None) => break,
                Err(cancelled) => {
                    yield Err(TodoError::from(cancelled));
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(&self, mut todo: Todo, cancel: &CancellationToken) -> TodoResult<Todo> {
        todo.id = Uuid::now_v7();
        let active_model: entity::ActiveModel = todo.into();

        let model = cancellable(cancel, active_model.insert(&self.db)).await??;

        tracing::info!(todo_id = %model.id, "Created todo");
        Ok(model.into())
    }

    fn list(&self, filters: Vec<TodoFilter>, cancel: CancellationToken) -> TodoStream {
        tracing::debug!(?filters, "Listing todos");
        Box::pin(row_stream(self.db.clone(), filters, cancel))
    }

    async fn get(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<Option<Todo>> {
        let model = cancellable(cancel, entity::Entity::find_by_id(id).one(&self.db)).await??;

        Ok(model.map(Into::into))
    }

    async fn update(&self, todo: Todo, cancel: &CancellationToken) -> TodoResult<Todo> {
        let id = todo.id;
        let statement = entity::Entity::update_many()
            .set(entity::ActiveModel::changes(todo.clone()))
            .filter(entity::Column::Id.eq(id));

        let result = cancellable(cancel, statement.exec(&self.db)).await??;
        if result.rows_affected == 0 {
            return Err(TodoError::NotFound(id));
        }

        tracing::info!(todo_id = %id, "Updated todo");
        Ok(todo)
    }

    async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<()> {
        let result = cancellable(cancel, entity::Entity::delete_by_id(id).exec(&self.db)).await??;
        if result.rows_affected == 0 {
            return Err(TodoError::NotFound(id));
        }

        tracing::info!(todo_id = %id, "Deleted todo");
        Ok(())
    }
}
