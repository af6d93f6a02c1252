use crate::models::{Priority, Todo};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM entity for the `todos` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_complete: bool,
    pub priority: Priority,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Todo {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            is_complete: model.is_complete,
            priority: model.priority,
        }
    }
}

impl From<Todo> for ActiveModel {
    fn from(todo: Todo) -> Self {
        ActiveModel {
            id: Set(todo.id),
            title: Set(todo.title),
            description: Set(todo.description),
            is_complete: Set(todo.is_complete),
            priority: Set(todo.priority),
        }
    }
}

impl ActiveModel {
    /// Every mutable column set, primary key left out
    pub fn changes(todo: Todo) -> Self {
        ActiveModel {
            id: NotSet,
            ..ActiveModel::from(todo)
        }
    }
}
