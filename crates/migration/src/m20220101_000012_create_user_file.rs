//! Create `user_file` table with FK to `user`.
//!
//! Rows are written by the file-storage side; the registry only reads them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserFile::Table)
                    .if_not_exists()
                    .col(uuid(UserFile::Id).primary_key())
                    .col(uuid(UserFile::UserId).not_null())
                    .col(string_len(UserFile::FileName, 255).not_null())
                    .col(string_len(UserFile::Key, 512).not_null())
                    .col(string_len(UserFile::Url, 1024).not_null())
                    .col(timestamp_with_time_zone(UserFile::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_file_user")
                            .from(UserFile::Table, UserFile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserFile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserFile { Table, Id, UserId, FileName, Key, Url, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
