use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TodoError, TodoResult};
use crate::filter::TodoFilter;
use crate::models::{Todo, TodoPayload, TodoQuery};
use crate::repository::{TodoRepository, TodoStream};

/// Request-level rules on top of a [`TodoRepository`]
pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// The body must not carry an id; the repository assigns one.
    #[instrument(skip(self, payload, cancel), fields(title = %payload.title))]
    pub async fn create_todo(
        &self,
        payload: TodoPayload,
        cancel: &CancellationToken,
    ) -> TodoResult<Todo> {
        if payload.id.is_some() {
            return Err(TodoError::Validation(
                "id must be empty when creating a todo".to_string(),
            ));
        }
        validate(&payload)?;

        self.repository.create(payload.into_todo(Uuid::nil()), cancel).await
    }

    pub fn list_todos(&self, query: TodoQuery, cancel: CancellationToken) -> TodoStream {
        let filters: Vec<TodoFilter> = query.into();
        self.repository.list(filters, cancel)
    }

    #[instrument(skip(self, cancel), fields(todo_id = %id))]
    pub async fn get_todo(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<Todo> {
        self.repository
            .get(id, cancel)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    /// Replace every mutable field of `id`. A body id, if present, must equal `id`.
    #[instrument(skip(self, payload, cancel), fields(todo_id = %id))]
    pub async fn update_todo(
        &self,
        id: Uuid,
        payload: TodoPayload,
        cancel: &CancellationToken,
    ) -> TodoResult<Todo> {
        if let Some(body_id) = payload.id.filter(|body_id| *body_id != id) {
            return Err(TodoError::Validation(format!(
                "id in body ({body_id}) does not match id in path ({id})"
            )));
        }
        validate(&payload)?;

        self.repository.update(payload.into_todo(id), cancel).await
    }

    #[instrument(skip(self, cancel), fields(todo_id = %id))]
    pub async fn delete_todo(&self, id: Uuid, cancel: &CancellationToken) -> TodoResult<()> {
        self.repository.delete(id, cancel).await
    }
}

fn validate(payload: &TodoPayload) -> TodoResult<()> {
    payload
        .validate()
        .map_err(|e| TodoError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::repository::MockTodoRepository;
    use futures::{StreamExt, TryStreamExt, stream};
    use mockall::predicate::eq;

    fn payload(title: &str) -> TodoPayload {
        TodoPayload {
            id: None,
            title: title.to_string(),
            description: Some("2%".to_string()),
            is_complete: false,
            priority: Priority::Normal,
        }
    }

    #[tokio::test]
    async fn test_create_delegates_without_id() {
        let mut repo = MockTodoRepository::new();
        let assigned = Uuid::now_v7();
        repo.expect_create()
            .withf(|todo, _| todo.id.is_nil() && todo.title == "Buy milk")
            .times(1)
            .returning(move |mut todo, _| {
                todo.id = assigned;
                Ok(todo)
            });

        let service = TodoService::new(repo);
        let created = service
            .create_todo(payload("Buy milk"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(created.id, assigned);
    }

    #[tokio::test]
    async fn test_create_rejects_client_id() {
        let mut repo = MockTodoRepository::new();
        repo.expect_create().never();

        let mut input = payload("Buy milk");
        input.id = Some(Uuid::now_v7());

        let err = TodoService::new(repo)
            .create_todo(input, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let mut repo = MockTodoRepository::new();
        repo.expect_create().never();

        let err = TodoService::new(repo)
            .create_todo(payload(""), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_maps_none_to_not_found() {
        let mut repo = MockTodoRepository::new();
        let id = Uuid::now_v7();
        repo.expect_get()
            .with(eq(id), mockall::predicate::always())
            .returning(|_, _| Ok(None));

        let err = TodoService::new(repo)
            .get_todo(id, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_id() {
        let mut repo = MockTodoRepository::new();
        repo.expect_update().never();

        let mut input = payload("x");
        input.id = Some(Uuid::now_v7());

        let err = TodoService::new(repo)
            .update_todo(Uuid::now_v7(), input, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_uses_path_id() {
        let id = Uuid::now_v7();
        let mut repo = MockTodoRepository::new();
        repo.expect_update()
            .withf(move |todo, _| todo.id == id && todo.priority == Priority::Highest)
            .times(1)
            .returning(|todo, _| Ok(todo));

        let service = TodoService::new(repo);
        let cancel = CancellationToken::new();

        let mut without_id = payload("x");
        without_id.priority = Priority::Highest;
        service.update_todo(id, without_id, &cancel).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_accepts_matching_id() {
        let id = Uuid::now_v7();
        let mut repo = MockTodoRepository::new();
        repo.expect_update().times(1).returning(|todo, _| Ok(todo));

        let mut input = payload("x");
        input.id = Some(id);
        let updated = TodoService::new(repo)
            .update_todo(id, input, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(updated.id, id);
    }

    #[tokio::test]
    async fn test_update_propagates_not_found() {
        let id = Uuid::now_v7();
        let mut repo = MockTodoRepository::new();
        repo.expect_update()
            .returning(|todo, _| Err(TodoError::NotFound(todo.id)));

        let err = TodoService::new(repo)
            .update_todo(id, payload("x"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_list_translates_query_into_filters() {
        let mut repo = MockTodoRepository::new();
        repo.expect_list()
            .withf(|filters, _| {
                filters
                    == &vec![
                        TodoFilter::Priority(Priority::High),
                        TodoFilter::Completed(false),
                    ]
            })
            .times(1)
            .returning(|_, _| stream::empty().boxed());

        let query = TodoQuery {
            priority: Some(Priority::High),
            is_complete: Some(false),
            title: None,
        };
        let todos: Vec<Todo> = TodoService::new(repo)
            .list_todos(query, CancellationToken::new())
            .try_collect()
            .await
            .unwrap();
        assert!(todos.is_empty());
    }

    #[tokio::test]
    async fn test_delete_delegates() {
        let id = Uuid::now_v7();
        let mut repo = MockTodoRepository::new();
        repo.expect_delete()
            .with(eq(id), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));

        TodoService::new(repo)
            .delete_todo(id, &CancellationToken::new())
            .await
            .unwrap();
    }
}
