use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Todos::Table)
                    .if_not_exists()
                    .col(pk_uuid(Todos::Id))
                    .col(string_len(Todos::Title, 128))
                    .col(text_null(Todos::Description))
                    .col(boolean(Todos::IsComplete).default(false))
                    .col(small_integer(Todos::Priority).default(2))
                    .to_owned(),
            )
            .await?;

        // Priority ordinals: 0 (lowest) through 4 (highest)
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE todos
                    ADD CONSTRAINT todos_priority_range
                    CHECK (priority BETWEEN 0 AND 4)
                "#,
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todos_priority")
                    .table(Todos::Table)
                    .col(Todos::Priority)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todos_is_complete")
                    .table(Todos::Table)
                    .col(Todos::IsComplete)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Todos::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Todos {
    Table,
    Id,
    Title,
    Description,
    IsComplete,
    Priority,
}
