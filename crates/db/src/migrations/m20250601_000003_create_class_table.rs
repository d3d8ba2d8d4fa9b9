//! Create class table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Class::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Class::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Class::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Class::Description).text().null())
                    .col(
                        ColumnDef::new(Class::AccessCode)
                            .string_len(6)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Class::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Class::TeacherId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Class::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_teacher")
                            .from(Class::Table, Class::TeacherId)
                            .to(Teacher::Table, Teacher::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: teacher_id (for dashboard listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_class_teacher_id")
                    .table(Class::Table)
                    .col(Class::TeacherId)
                    .to_owned(),
            )
            .await?;

        // Index: access_code (for join-by-code lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_class_access_code")
                    .table(Class::Table)
                    .col(Class::AccessCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Class::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Class {
    Table,
    Id,
    Name,
    Description,
    AccessCode,
    Status,
    TeacherId,
    CreatedAt,
}

#[derive(Iden)]
enum Teacher {
    Table,
    Id,
}
