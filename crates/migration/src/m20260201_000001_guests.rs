//! Guests table.
//!
//! A guest is identified by an auto-incremented id; the pair
//! `(first_name, last_name)` is unique.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub(crate) enum Guests {
    Table,
    Id,
    FirstName,
    LastName,
    Comment,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Guests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Guests::FirstName).string().not_null())
                    .col(ColumnDef::new(Guests::LastName).string().not_null())
                    .col(ColumnDef::new(Guests::Comment).text())
                    .col(
                        ColumnDef::new(Guests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Guests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-guests-first_name-last_name-unique")
                    .table(Guests::Table)
                    .col(Guests::FirstName)
                    .col(Guests::LastName)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guests::Table).to_owned())
            .await
    }
}
