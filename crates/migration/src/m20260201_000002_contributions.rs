//! Contributions table.
//!
//! Every contribution belongs to a guest and is removed together with it.

use sea_orm_migration::prelude::*;

use crate::m20260201_000001_guests::Guests;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Contributions {
    Table,
    Id,
    GuestId,
    Category,
    Description,
    Servings,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contributions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contributions::GuestId).integer().not_null())
                    .col(
                        ColumnDef::new(Contributions::Category)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(Contributions::Category).is_in([
                                "SALTY", "SWEET", "DRINK", "SIDE",
                            ])),
                    )
                    .col(ColumnDef::new(Contributions::Description).string().not_null())
                    .col(
                        ColumnDef::new(Contributions::Servings)
                            .integer()
                            .not_null()
                            .check(Expr::col(Contributions::Servings).between(1, 50)),
                    )
                    .col(
                        ColumnDef::new(Contributions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contributions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contributions-guest_id")
                            .from(Contributions::Table, Contributions::GuestId)
                            .to(Guests::Table, Guests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-contributions-guest_id")
                    .table(Contributions::Table)
                    .col(Contributions::GuestId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-contributions-category")
                    .table(Contributions::Table)
                    .col(Contributions::Category)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contributions::Table).to_owned())
            .await
    }
}
