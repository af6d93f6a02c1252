//! Composable list filters.
//!
//! Every filter is a pure predicate over [`Todo`]. A list of filters is ANDed:
//! an empty list matches everything. The Postgres repository lowers the same
//! filters to SQL through [`TodoFilter::condition`], so new kinds are added here
//! and nowhere else.
//!
//! Title matching is case-insensitive on both sides, but case folding differs:
//! Unicode lowercasing in memory, `ILIKE` under the database locale in Postgres.
//! Mixed-case ASCII and accented Latin letters fold the same way in both;
//! special foldings such as `ß` → `SS` are not guaranteed to agree.

use sea_orm::{ColumnTrait, Condition, sea_query::Expr};
use serde::Serialize;

use crate::entity::Column;
use crate::models::{Priority, Todo, TodoQuery};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TodoFilter {
    /// Priority equals the given level
    Priority(Priority),
    /// Completion flag equals the given value
    Completed(bool),
    /// Title contains the given text, ignoring case
    TitleContains(String),
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            TodoFilter::Priority(priority) => todo.priority == *priority,
            TodoFilter::Completed(done) => todo.is_complete == *done,
            TodoFilter::TitleContains(needle) => todo
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }

    pub fn condition(&self) -> Condition {
        let condition = Condition::all();
        match self {
            TodoFilter::Priority(priority) => condition.add(Column::Priority.eq(*priority)),
            TodoFilter::Completed(done) => condition.add(Column::IsComplete.eq(*done)),
            TodoFilter::TitleContains(needle) => {
                let pattern = format!("%{}%", escape_like(needle));
                condition.add(Expr::cust_with_values(r#""todos"."title" ILIKE ?"#, [pattern]))
            }
        }
    }
}

pub fn matches_all(filters: &[TodoFilter], todo: &Todo) -> bool {
    filters.iter().all(|filter| filter.matches(todo))
}

pub fn condition_all(filters: &[TodoFilter]) -> Condition {
    filters
        .iter()
        .fold(Condition::all(), |acc, filter| acc.add(filter.condition()))
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl From<TodoQuery> for Vec<TodoFilter> {
    fn from(query: TodoQuery) -> Self {
        let mut filters = Vec::new();
        if let Some(priority) = query.priority {
            filters.push(TodoFilter::Priority(priority));
        }
        if let Some(done) = query.is_complete {
            filters.push(TodoFilter::Completed(done));
        }
        if let Some(title) = query.title.filter(|t| !t.is_empty()) {
            filters.push(TodoFilter::TitleContains(title));
        }
        filters
    }
}
